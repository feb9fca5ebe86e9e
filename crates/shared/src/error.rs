use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure taxonomy of an animated transition. None of these reach the
/// caller of a navigation request; they are reported through events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    CapabilityAbsent,
    AnimationRejected,
    AnimationStalled,
    SetupException,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl TransitionFailure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route url must not be empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation controller must be created inside a tokio runtime")]
    NoRuntime,
    #[error("invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
}
