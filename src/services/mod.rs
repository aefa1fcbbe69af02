pub mod language_model;
pub mod ticket_store;

pub use language_model::GenerationService;
pub use ticket_store::{TicketBatch, TicketStore, WorkflowLookup};
