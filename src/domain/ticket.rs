use crate::domain::project::ProjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriorityId(pub u64);

/// A provider-proposed ticket before persistence. The parser only constructs
/// drafts whose title and description are non-empty after trimming; a draft
/// never carries a "partial" value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
}

/// Row handed to the ticket store for creation. Status and priority stay
/// unset when no default could be resolved; the store decides whether an
/// unset status is acceptable.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub status_id: Option<StatusId>,
    pub priority_id: Option<PriorityId>,
}

/// A persisted ticket. The id is owned by the store.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub status_id: Option<StatusId>,
    pub priority_id: Option<PriorityId>,
}
