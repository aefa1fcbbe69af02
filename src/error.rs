use std::fmt;
use std::io;

use thiserror::Error;

/// Failures raised by the language-model client layer. Exactly one kind per
/// raised error; kinds are never composed.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI provider API key not configured")]
    ConfigMissing,
    #[error("AI provider API key is malformed, check the configuration")]
    ConfigInvalid,
    #[error("AI provider rate limit reached, try again later")]
    RateLimited,
    #[error("AI provider rejected the configured API key")]
    Unauthorized,
    #[error("connection to the AI provider failed: {0}")]
    NetworkFailure(String),
    #[error("request to the AI provider timed out")]
    Timeout,
    #[error("AI provider returned an unusable response: {0}")]
    MalformedResponse(String),
}

/// Draft field named by a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
        })
    }
}

#[derive(Debug, Error)]
#[error("ticket store error: {0}")]
pub struct StoreError(pub String);

/// Failures raised by the ticket generation workflow. Client-layer errors
/// pass through unchanged; this taxonomy only covers what the workflow
/// itself detects.
#[derive(Debug, Error)]
pub enum TicketGenerationError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("ticket #{index} is missing a {field}")]
    InvalidDraft { index: usize, field: DraftField },
    #[error("generation produced no usable tickets")]
    EmptyBatch,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    TicketGeneration(#[from] TicketGenerationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::TicketGeneration(TicketGenerationError::Generation(err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
