//! Drag Session - gesture lifecycle state machine
//!
//! One `DragSession` tracks one drag-and-drop gesture at a time:
//!
//! ```text
//! Idle -> Dragging -> HoveringTarget -> Committing -> Idle
//!            |              |
//!            +--- cancel ---+--> Idle (Cancelled)
//! ```
//!
//! Dropping runs the descendant guard and the reorder planner against the
//! current node store snapshot. Rejected and unchanged drops return to `Idle`
//! without contacting the gateway. Non-empty plans are forwarded to the
//! gateway. The node store is replaced with the gateway's authoritative node
//! list only after the gateway reports success.
//!
//! `release` borrows the session mutably across the gateway await, so no new
//! gesture can start while a commit is in flight.

use crate::db::CommitGateway;
use crate::models::{CategorySnapshot, NodePatch};
use crate::operations::{plan, RejectReason};
use crate::services::error::SessionError;
use crate::services::node_store::NodeStore;
use std::sync::Arc;

/// Current state of a drag session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        dragged_id: String,
    },
    HoveringTarget {
        dragged_id: String,
        target_id: String,
    },
    /// Patches were sent to the gateway and the session awaits its answer
    Committing {
        dragged_id: String,
        target_id: String,
    },
}

impl DragState {
    /// Short state name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::HoveringTarget { .. } => "hovering_target",
            Self::Committing { .. } => "committing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Id of the node being dragged, if a gesture is in progress
    pub fn dragged_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { dragged_id }
            | Self::HoveringTarget { dragged_id, .. }
            | Self::Committing { dragged_id, .. } => Some(dragged_id),
        }
    }
}

/// How a finished gesture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The gateway accepted the patches and the node store was replaced
    Committed { patches: Vec<NodePatch> },
    /// The drop was legal but nothing moved; the gateway was not called
    Unchanged,
    /// The drop was illegal; the gateway was not called
    Rejected(RejectReason),
    /// The gesture was aborted without a drop
    Cancelled,
}

/// Holds a session in `Committing` for the duration of one gateway call
///
/// `finish` returns the session to `Idle`. Dropping the guard unfinished
/// means the `release` future was abandoned mid-commit; the state is left in
/// `Committing` so only `refresh` can clear it.
struct CommitGuard<'a> {
    state: &'a mut DragState,
    finished: bool,
}

impl<'a> CommitGuard<'a> {
    fn enter(state: &'a mut DragState, dragged_id: String, target_id: String) -> Self {
        *state = DragState::Committing {
            dragged_id,
            target_id,
        };
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self) {
        *self.state = DragState::Idle;
        self.finished = true;
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                "Commit abandoned in {:?}; refresh the session before the next gesture",
                self.state
            );
        }
    }
}

/// Drag-and-drop session over one tenant's category tree
pub struct DragSession<G: CommitGateway + ?Sized> {
    store: Arc<NodeStore>,
    gateway: Arc<G>,
    state: DragState,
}

impl<G: CommitGateway + ?Sized> DragSession<G> {
    pub fn new(store: Arc<NodeStore>, gateway: Arc<G>) -> Self {
        Self {
            store,
            gateway,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn store(&self) -> &Arc<NodeStore> {
        &self.store
    }

    /// Begin dragging `dragged_id`
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is idle.
    pub fn start(&mut self, dragged_id: impl Into<String>) -> Result<(), SessionError> {
        if !self.state.is_idle() {
            return Err(SessionError::invalid_transition(self.state.name(), "start"));
        }

        let dragged_id = dragged_id.into();
        tracing::debug!("Drag started on category '{}'", dragged_id);
        self.state = DragState::Dragging { dragged_id };
        Ok(())
    }

    /// Move the pointer over `target_id`
    ///
    /// May be called repeatedly; only the latest target is kept.
    pub fn hover(&mut self, target_id: impl Into<String>) -> Result<(), SessionError> {
        let dragged_id = match &self.state {
            DragState::Dragging { dragged_id } | DragState::HoveringTarget { dragged_id, .. } => {
                dragged_id.clone()
            }
            other => return Err(SessionError::invalid_transition(other.name(), "hover")),
        };

        self.state = DragState::HoveringTarget {
            dragged_id,
            target_id: target_id.into(),
        };
        Ok(())
    }

    /// Abort the gesture without dropping
    pub fn cancel(&mut self) -> Result<DropOutcome, SessionError> {
        match &self.state {
            DragState::Dragging { dragged_id } | DragState::HoveringTarget { dragged_id, .. } => {
                tracing::debug!("Drag of category '{}' cancelled", dragged_id);
                self.state = DragState::Idle;
                Ok(DropOutcome::Cancelled)
            }
            other => Err(SessionError::invalid_transition(other.name(), "cancel")),
        }
    }

    /// Drop the dragged node onto the hovered target
    ///
    /// Releasing without ever hovering a target is a cancel. In every
    /// outcome, success or error, the session ends in `Idle`. If the returned
    /// future is dropped while the gateway call is pending, the commit result
    /// is unknown: the session stays in `Committing` and every gesture fails
    /// with an `InvalidTransition` whose `requires_refresh()` is true until
    /// `refresh` succeeds.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` when idle or already committing
    /// - `CommitFailed` when the gateway refuses or fails; the node store is
    ///   left unchanged
    pub async fn release(&mut self) -> Result<DropOutcome, SessionError> {
        let (dragged_id, target_id) = match &self.state {
            DragState::HoveringTarget {
                dragged_id,
                target_id,
            } => (dragged_id.clone(), target_id.clone()),
            DragState::Dragging { .. } => return self.cancel(),
            other => return Err(SessionError::invalid_transition(other.name(), "release")),
        };

        let snapshot = self.store.snapshot().await;
        let reorder = match plan(&dragged_id, &target_id, &snapshot) {
            Ok(reorder) => reorder,
            Err(reason) => {
                tracing::info!("Drop rejected: {}", reason);
                self.state = DragState::Idle;
                return Ok(DropOutcome::Rejected(reason));
            }
        };

        if reorder.is_empty() {
            tracing::debug!(
                "Drop of '{}' onto '{}' changes nothing",
                dragged_id,
                target_id
            );
            self.state = DragState::Idle;
            return Ok(DropOutcome::Unchanged);
        }

        let guard = CommitGuard::enter(&mut self.state, dragged_id, target_id);
        let result = self
            .gateway
            .reorder(&reorder.tenant_id, reorder.patches.clone())
            .await;
        guard.finish();

        match result {
            Ok(nodes) => {
                self.store.replace(nodes).await;
                tracing::info!(
                    "Committed {} patches moving category '{}'",
                    reorder.patches.len(),
                    reorder.dragged_id
                );
                Ok(DropOutcome::Committed {
                    patches: reorder.patches,
                })
            }
            Err(e) => {
                tracing::warn!(
                    "Commit moving category '{}' failed: {}",
                    reorder.dragged_id,
                    e
                );
                Err(SessionError::CommitFailed(e))
            }
        }
    }

    /// Re-fetch the tenant's nodes from the gateway and replace the snapshot
    ///
    /// This is the recovery path after a stale-snapshot commit failure. It is
    /// also accepted in `Committing`, which a session is only left in when a
    /// `release` future was dropped mid-commit; a successful refresh returns
    /// it to `Idle`.
    pub async fn refresh(&mut self) -> Result<Arc<CategorySnapshot>, SessionError> {
        if !matches!(self.state, DragState::Idle | DragState::Committing { .. }) {
            return Err(SessionError::invalid_transition(self.state.name(), "refresh"));
        }

        let snapshot = self
            .store
            .refresh(self.gateway.as_ref())
            .await
            .map_err(SessionError::RefreshFailed)?;
        self.state = DragState::Idle;
        tracing::debug!(
            "Refreshed {} categories for tenant '{}'",
            snapshot.len(),
            self.store.tenant_id()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryCategoryStore;
    use crate::models::CategoryNode;
    use serde_json::json;

    fn node(id: &str, parent: Option<&str>, order: u32) -> CategoryNode {
        CategoryNode::with_id(id, "tenant", parent.map(str::to_string), order, json!({}))
    }

    async fn session() -> DragSession<InMemoryCategoryStore> {
        let gateway = Arc::new(InMemoryCategoryStore::new());
        gateway
            .insert_nodes(vec![
                node("r1", None, 0),
                node("r2", None, 1),
                node("c1", Some("r1"), 0),
            ])
            .await
            .unwrap();
        let store = Arc::new(NodeStore::load("tenant", gateway.as_ref()).await.unwrap());
        DragSession::new(store, gateway)
    }

    #[tokio::test]
    async fn test_gesture_transitions() {
        let mut session = session().await;
        assert!(session.state().is_idle());

        session.start("c1").unwrap();
        assert_eq!(session.state().name(), "dragging");
        assert_eq!(session.state().dragged_id(), Some("c1"));

        session.hover("r1").unwrap();
        session.hover("r2").unwrap();
        assert_eq!(
            session.state(),
            &DragState::HoveringTarget {
                dragged_id: "c1".to_string(),
                target_id: "r2".to_string(),
            }
        );

        assert_eq!(session.cancel().unwrap(), DropOutcome::Cancelled);
        assert!(session.state().is_idle());
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let mut session = session().await;

        assert_eq!(
            session.hover("r1").unwrap_err(),
            SessionError::invalid_transition("idle", "hover")
        );
        assert!(session.cancel().is_err());
        assert!(session.release().await.is_err());

        session.start("r1").unwrap();
        assert_eq!(
            session.start("r2").unwrap_err(),
            SessionError::invalid_transition("dragging", "start")
        );
        assert!(session.refresh().await.is_err());
    }

    #[tokio::test]
    async fn test_release_without_target_cancels() {
        let mut session = session().await;
        session.start("r1").unwrap();

        assert_eq!(session.release().await.unwrap(), DropOutcome::Cancelled);
        assert!(session.state().is_idle());
    }

    #[tokio::test]
    async fn test_release_commits_and_replaces_store() {
        let mut session = session().await;
        let before = session.store().snapshot().await;

        session.start("r2").unwrap();
        session.hover("r1").unwrap();
        let outcome = session.release().await.unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Committed {
                patches: vec![NodePatch::new("r2", Some("r1".to_string()), 1)],
            }
        );
        assert!(session.state().is_idle());

        let after = session.store().snapshot().await;
        assert_eq!(after.get("r2").unwrap().parent_id.as_deref(), Some("r1"));
        assert_eq!(after.get("r2").unwrap().order, 1);
        assert_eq!(after.get("c1").unwrap().order, 0);
        assert!(before.get("r2").unwrap().is_root());
    }

    #[tokio::test]
    async fn test_release_rejects_self_drop() {
        let mut session = session().await;
        session.start("r1").unwrap();
        session.hover("r1").unwrap();

        assert_eq!(
            session.release().await.unwrap(),
            DropOutcome::Rejected(RejectReason::no_op("r1".to_string()))
        );
        assert!(session.state().is_idle());
    }

    #[test]
    fn test_commit_guard_finish_returns_to_idle() {
        let mut state = DragState::HoveringTarget {
            dragged_id: "c1".to_string(),
            target_id: "r2".to_string(),
        };

        let guard = CommitGuard::enter(&mut state, "c1".to_string(), "r2".to_string());
        guard.finish();

        assert!(state.is_idle());
    }

    #[test]
    fn test_abandoned_commit_guard_stays_committing() {
        let mut state = DragState::Idle;

        let guard = CommitGuard::enter(&mut state, "c1".to_string(), "r2".to_string());
        drop(guard);

        assert_eq!(state.name(), "committing");
        assert_eq!(state.dragged_id(), Some("c1"));
    }

    #[tokio::test]
    async fn test_refresh_from_idle() {
        let mut session = session().await;
        let snapshot = session.refresh().await.unwrap();
        assert_eq!(snapshot.len(), 3);
        assert!(session.state().is_idle());
    }
}
