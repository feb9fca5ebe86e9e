use serde::{Deserialize, Serialize};

use crate::{
    domain::{RouteUrl, TransitionId},
    error::{ErrorCode, TransitionFailure},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStage {
    Ready,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Completed,
    Rejected { stage: SwapStage, reason: String },
    Stalled,
    SetupFailed { reason: String },
}

impl TransitionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn failure(&self) -> Option<TransitionFailure> {
        match self {
            Self::Completed => None,
            Self::Rejected { stage, reason } => Some(TransitionFailure::new(
                ErrorCode::AnimationRejected,
                format!("{stage:?} signal rejected: {reason}"),
            )),
            Self::Stalled => Some(TransitionFailure::new(
                ErrorCode::AnimationStalled,
                "no completion signal before timeout",
            )),
            Self::SetupFailed { reason } => Some(TransitionFailure::new(
                ErrorCode::SetupException,
                reason.clone(),
            )),
        }
    }
}

/// Lifecycle notifications published by the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// Plain route change because animated transitions are unavailable.
    FallbackNavigation { url: RouteUrl },
    Started { id: TransitionId, url: RouteUrl },
    /// Request arrived while busy. `replaced` holds the url it overwrote.
    Queued {
        url: RouteUrl,
        replaced: Option<RouteUrl>,
    },
    Committed { id: TransitionId, url: RouteUrl },
    Settled {
        id: TransitionId,
        outcome: TransitionOutcome,
    },
    QueuedNavigationCommitted { url: RouteUrl },
    LockForceReleased { id: TransitionId },
}
