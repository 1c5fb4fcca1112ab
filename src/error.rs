use crate::config::ConfigError;
use crate::models::Field;

pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields";
pub const AUTHENTICATION_MESSAGE: &str = "You must be logged in to create events";
pub const REJECTION_FALLBACK: &str = "Failed to create event";
pub const TRANSPORT_FALLBACK: &str = "Failed to create event. Please try again.";

/// Why a submission attempt ended without creating an event.
///
/// The `Display` output of every variant is the exact string shown to the
/// user in the form's error slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation { missing: Vec<Field> },

    #[error("{}", AUTHENTICATION_MESSAGE)]
    AuthenticationMissing,

    #[error("{message}")]
    RemoteRejection { status: u16, message: String },

    #[error("{0}")]
    Transport(String),
}

impl SubmitError {
    /// Whether the error was raised before anything went over the wire.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SubmitError::Validation { .. } | SubmitError::AuthenticationMissing
        )
    }
}

/// Failures of the HTTP exchange itself, as opposed to a server refusal.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(String),
}

impl TransportError {
    /// The error's own message, or the generic fallback when it has none.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            TRANSPORT_FALLBACK.to_string()
        } else {
            message
        }
    }
}

impl From<TransportError> for SubmitError {
    fn from(error: TransportError) -> Self {
        SubmitError::Transport(error.user_message())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
