use thiserror::Error;

/// Failure of a user action. The operation that returned it changed nothing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("supervisor confirmation does not match")]
    Unauthorized,
    #[error("settings are locked while the supervised block is active")]
    Locked,
}

impl ActionError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ActionError::InvalidInput(reason.into())
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
