//! Drag Session Error Types
//!
//! Structural rejections are not errors: they come back as
//! `DropOutcome::Rejected`. The errors here cover gestures sent in the wrong
//! state and gateway failures during commit or refresh.

use crate::db::GatewayError;
use thiserror::Error;

/// Drag session operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The gesture event is not valid in the current state
    ///
    /// In state `committing` a previous `release` was abandoned before the
    /// gateway answered; call `DragSession::refresh` to re-read the tree and
    /// return to `idle` (see `requires_refresh`).
    #[error("Drag event '{event}' is not valid in state '{state}'")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    /// The gateway refused or failed the commit; the node store is unchanged
    #[error("Commit failed: {0}")]
    CommitFailed(#[source] GatewayError),

    /// Re-fetching the tenant's nodes failed; the node store is unchanged
    #[error("Refresh failed: {0}")]
    RefreshFailed(#[source] GatewayError),
}

impl SessionError {
    /// Create an InvalidTransition error
    pub fn invalid_transition(state: &'static str, event: &'static str) -> Self {
        Self::InvalidTransition { state, event }
    }

    /// True when the session is stuck after an abandoned commit and only
    /// `DragSession::refresh` can recover it
    pub fn requires_refresh(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition {
                state: "committing",
                ..
            }
        )
    }

    /// The underlying gateway failure, if any
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::CommitFailed(e) | Self::RefreshFailed(e) => Some(e),
            Self::InvalidTransition { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = SessionError::invalid_transition("idle", "hover");
        assert_eq!(
            format!("{}", err),
            "Drag event 'hover' is not valid in state 'idle'"
        );
        assert!(err.gateway_error().is_none());
        assert!(!err.requires_refresh());
    }

    #[test]
    fn test_committing_transition_requires_refresh() {
        let err = SessionError::invalid_transition("committing", "start");
        assert!(err.requires_refresh());
        assert!(!SessionError::CommitFailed(GatewayError::transport("timeout")).requires_refresh());
    }

    #[test]
    fn test_commit_failed_exposes_gateway_error() {
        let err = SessionError::CommitFailed(GatewayError::transport("timeout"));
        assert_eq!(format!("{}", err), "Commit failed: Transport failure: timeout");
        assert_eq!(
            err.gateway_error(),
            Some(&GatewayError::transport("timeout"))
        );
    }
}
