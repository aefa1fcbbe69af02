use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::project::ProjectId;
use crate::domain::ticket::{NewTicket, PriorityId, StatusId, Ticket, TicketId};
use crate::error::StoreError;
use crate::services::ticket_store::name_matches;
use crate::services::{TicketBatch, TicketStore, WorkflowLookup};

#[derive(Debug, Clone)]
struct StatusRow {
    id: StatusId,
    project_id: ProjectId,
    name: String,
}

#[derive(Debug, Clone)]
struct PriorityRow {
    id: PriorityId,
    name: String,
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    tickets: Vec<Ticket>,
    statuses: Vec<StatusRow>,
    priorities: Vec<PriorityRow>,
}

impl Tables {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Deterministic ticket store backing the CLI and the end-to-end tests.
/// Batch writes are staged and only become visible on commit.
pub struct InMemoryTicketStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::default(),
        }
    }

    pub fn insert_status(&self, project_id: ProjectId, name: &str) -> Result<StatusId, StoreError> {
        let mut tables = lock(&self.tables)?;
        let id = StatusId(tables.allocate_id());
        tables.statuses.push(StatusRow {
            id,
            project_id,
            name: name.to_string(),
        });
        Ok(id)
    }

    pub fn insert_priority(&self, name: &str) -> Result<PriorityId, StoreError> {
        let mut tables = lock(&self.tables)?;
        let id = PriorityId(tables.allocate_id());
        tables.priorities.push(PriorityRow {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    pub fn find_by_project(&self, project_id: ProjectId) -> Result<Vec<Ticket>, StoreError> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .tickets
            .iter()
            .filter(|ticket| ticket.project_id == project_id)
            .cloned()
            .collect())
    }
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>, StoreError> {
    tables
        .lock()
        .map_err(|_| StoreError("ticket store lock poisoned".to_string()))
}

#[async_trait]
impl WorkflowLookup for InMemoryTicketStore {
    async fn find_status_id(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> Result<Option<StatusId>, StoreError> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .statuses
            .iter()
            .find(|row| row.project_id == project_id && name_matches(&row.name, name))
            .map(|row| row.id))
    }

    async fn find_priority_id(&self, name: &str) -> Result<Option<PriorityId>, StoreError> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .priorities
            .iter()
            .find(|row| name_matches(&row.name, name))
            .map(|row| row.id))
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn begin(&self) -> Result<Box<dyn TicketBatch>, StoreError> {
        Ok(Box::new(InMemoryBatch {
            tables: Arc::clone(&self.tables),
            staged: Vec::new(),
        }))
    }
}

struct InMemoryBatch {
    tables: Arc<Mutex<Tables>>,
    staged: Vec<Ticket>,
}

#[async_trait]
impl TicketBatch for InMemoryBatch {
    async fn create(&mut self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        // Ids are handed out eagerly, like a database sequence; a rolled-back
        // batch leaves a gap, never a row.
        let id = {
            let mut tables = lock(&self.tables)?;
            TicketId(tables.allocate_id())
        };
        let row = Ticket {
            id,
            project_id: ticket.project_id,
            name: ticket.name,
            description: ticket.description,
            status_id: ticket.status_id,
            priority_id: ticket.priority_id,
        };
        self.staged.push(row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryBatch { tables, mut staged } = *self;
        let mut guard = lock(&tables)?;
        guard.tickets.append(&mut staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_ticket(project_id: ProjectId, name: &str) -> NewTicket {
        NewTicket {
            project_id,
            name: name.to_string(),
            description: "desc".to_string(),
            status_id: None,
            priority_id: None,
        }
    }

    #[tokio::test]
    async fn committed_batch_is_visible() {
        let store = InMemoryTicketStore::new();
        let project = ProjectId(1);

        let mut batch = store.begin().await.expect("begin failed");
        batch.create(new_ticket(project, "A")).await.expect("create failed");
        batch.create(new_ticket(project, "B")).await.expect("create failed");
        batch.commit().await.expect("commit failed");

        let tickets = store.find_by_project(project).expect("lookup failed");
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].name, "A");
    }

    #[tokio::test]
    async fn dropped_batch_leaves_no_rows() {
        let store = InMemoryTicketStore::new();
        let project = ProjectId(1);

        {
            let mut batch = store.begin().await.expect("begin failed");
            batch.create(new_ticket(project, "A")).await.expect("create failed");
            // No commit; the batch is dropped here.
        }

        assert!(store.find_by_project(project).expect("lookup failed").is_empty());
    }

    #[tokio::test]
    async fn status_lookup_is_project_scoped() {
        let store = InMemoryTicketStore::new();
        let ours = ProjectId(1);
        let theirs = ProjectId(2);
        let id = store.insert_status(ours, "backlog").expect("insert failed");

        let found = store.find_status_id(ours, "backlog").await.expect("lookup failed");
        assert_eq!(found, Some(id));

        let missing = store.find_status_id(theirs, "backlog").await.expect("lookup failed");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn name_lookups_ignore_case() {
        let store = InMemoryTicketStore::new();
        let id = store.insert_priority("Medium").expect("insert failed");

        let found = store.find_priority_id("medium").await.expect("lookup failed");
        assert_eq!(found, Some(id));
    }
}
