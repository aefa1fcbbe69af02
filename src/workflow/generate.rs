use tracing::info;

use crate::context::AppContext;
use crate::domain::project::Project;
use crate::domain::ticket::{NewTicket, TicketDraft};
use crate::error::{DraftField, TicketGenerationError};
use crate::generation::{parser, prompt};
use crate::workflow::defaults;

const CRITERIA_HEADING: &str = "**Acceptance Criteria:**";

/// Generate starter tickets for a project and persist them as one atomic
/// batch. Returns the number of tickets created. Client-layer failures
/// propagate unchanged; the batch is rolled back on any create failure.
pub async fn generate_for_project(
    ctx: &AppContext,
    project: &Project,
    user_prompt: Option<&str>,
) -> Result<usize, TicketGenerationError> {
    info!(
        project_id = project.id.0,
        project_name = %project.name,
        has_user_prompt = user_prompt.is_some(),
        "starting ticket generation"
    );

    let prompt = prompt::build(&project.name, project.description.as_deref(), user_prompt);
    let raw = ctx.generation.generate(&prompt).await?;
    let drafts = parser::parse(&raw)?;

    // Drafts may in principle arrive from sources other than the parser, so
    // the upstream filtering is not trusted here.
    validate_drafts(&drafts)?;

    let resolved = defaults::resolve(ctx.workflow.as_ref(), project.id).await?;

    let mut batch = ctx.tickets.begin().await?;
    for draft in &drafts {
        batch
            .create(NewTicket {
                project_id: project.id,
                name: draft.title.clone(),
                description: render_description(draft),
                status_id: resolved.status_id,
                priority_id: resolved.priority_id,
            })
            .await?;
    }
    batch.commit().await?;

    info!(
        project_id = project.id.0,
        count = drafts.len(),
        "created tickets for project"
    );
    Ok(drafts.len())
}

fn validate_drafts(drafts: &[TicketDraft]) -> Result<(), TicketGenerationError> {
    for (index, draft) in drafts.iter().enumerate() {
        if draft.title.trim().is_empty() {
            return Err(TicketGenerationError::InvalidDraft {
                index,
                field: DraftField::Title,
            });
        }
        if draft.description.trim().is_empty() {
            return Err(TicketGenerationError::InvalidDraft {
                index,
                field: DraftField::Description,
            });
        }
    }

    if drafts.is_empty() {
        return Err(TicketGenerationError::EmptyBatch);
    }

    Ok(())
}

/// Persisted description: the draft text, followed by a bulleted criteria
/// block when the draft carries any acceptance criteria.
fn render_description(draft: &TicketDraft) -> String {
    let mut description = draft.description.clone();
    if !draft.acceptance_criteria.is_empty() {
        description.push_str(&format!("\n\n{CRITERIA_HEADING}\n"));
        for criterion in &draft.acceptance_criteria {
            description.push_str(&format!("- {criterion}\n"));
        }
    }
    description
}
