use std::sync::Arc;

use crate::services::{GenerationService, TicketStore, WorkflowLookup};

/// Shared handles to the pipeline's external collaborators.
#[derive(Clone)]
pub struct AppContext {
    pub generation: Arc<dyn GenerationService>,
    pub tickets: Arc<dyn TicketStore>,
    pub workflow: Arc<dyn WorkflowLookup>,
}

impl AppContext {
    pub fn new(
        generation: Arc<dyn GenerationService>,
        tickets: Arc<dyn TicketStore>,
        workflow: Arc<dyn WorkflowLookup>,
    ) -> Self {
        Self {
            generation,
            tickets,
            workflow,
        }
    }
}
