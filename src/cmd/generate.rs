use crate::context::AppContext;
use crate::domain::project::Project;
use crate::error::AppResult;
use crate::workflow::generate::generate_for_project;

#[derive(Debug, Clone)]
pub struct GenerateCommandArgs {
    pub project: Project,
    pub prompt: Option<String>,
}

pub async fn run(ctx: &AppContext, args: GenerateCommandArgs) -> AppResult<usize> {
    let count = generate_for_project(ctx, &args.project, args.prompt.as_deref()).await?;
    Ok(count)
}
