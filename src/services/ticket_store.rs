use async_trait::async_trait;

use crate::domain::project::ProjectId;
use crate::domain::ticket::{NewTicket, PriorityId, StatusId, Ticket};
use crate::error::StoreError;

/// Name matching policy for workflow lookups: trimmed, ASCII-case-insensitive.
/// "medium" and "Medium" resolve to the same row.
pub fn name_matches(stored: &str, requested: &str) -> bool {
    stored.trim().eq_ignore_ascii_case(requested.trim())
}

/// Read capability over workflow metadata, used to resolve default status
/// and priority without constructing a full ticket.
#[async_trait]
pub trait WorkflowLookup: Send + Sync {
    /// Status lookup is scoped to one project.
    async fn find_status_id(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> Result<Option<StatusId>, StoreError>;

    /// Priority lookup is global.
    async fn find_priority_id(&self, name: &str) -> Result<Option<PriorityId>, StoreError>;
}

/// Transactional write seam over the external ticket store. A batch stages
/// creates until `commit`; dropping an uncommitted batch discards every
/// staged row, so a failed create never leaves a partial batch visible.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn TicketBatch>, StoreError>;
}

#[async_trait]
pub trait TicketBatch: Send {
    async fn create(&mut self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
