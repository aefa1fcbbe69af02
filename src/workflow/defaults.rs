use crate::domain::project::ProjectId;
use crate::domain::ticket::{PriorityId, StatusId};
use crate::error::StoreError;
use crate::services::WorkflowLookup;

pub const DEFAULT_STATUS_NAME: &str = "backlog";
pub const DEFAULT_PRIORITY_NAME: &str = "medium";

/// Resolved workflow metadata for one batch. Ephemeral; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowDefaults {
    pub status_id: Option<StatusId>,
    pub priority_id: Option<PriorityId>,
}

/// Resolve the default status and priority for tickets created without
/// explicit workflow metadata. A missing status stays unset here; whether
/// that is acceptable is the store's call at write time. A missing priority
/// is always tolerated.
pub async fn resolve(
    lookup: &dyn WorkflowLookup,
    project_id: ProjectId,
) -> Result<WorkflowDefaults, StoreError> {
    let status_id = lookup.find_status_id(project_id, DEFAULT_STATUS_NAME).await?;
    let priority_id = lookup.find_priority_id(DEFAULT_PRIORITY_NAME).await?;
    Ok(WorkflowDefaults {
        status_id,
        priority_id,
    })
}
