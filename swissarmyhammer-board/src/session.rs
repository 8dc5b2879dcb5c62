//! BoardSession - the single owner of the current board state.
//!
//! A session applies one drag-end at a time: compute the new state, install
//! it, re-resolve the open card, then hand the changed entities to the sync
//! adapter's queue. Mutation takes `&mut self`, so there is exactly one
//! writer. Batches reach the remote store in the order the moves were made.
//! The queue's worker is a tokio task, so the session must be driven from
//! inside a tokio runtime.

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::filter::{self, FilterMode, FilterPredicate};
use crate::moves::{MoveEngine, MoveIntent};
use crate::selection::{Selection, SelectionChange};
use crate::state::BoardState;
use crate::sync::{SyncAdapter, SyncQueue, SyncRequest};
use crate::types::{Card, CardId, Column, LabelId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Non-fatal events surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A drag referenced a column or card that no longer resolves
    MoveRejected(BoardError),
    /// A merged edit could not be applied
    EditRejected(BoardError),
    /// The open card disappeared and its detail view closed
    SelectionClosed(CardId),
}

/// What happened to a drag-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReport {
    /// New state installed; `changes` were handed to the sync adapter
    Applied {
        changes: Vec<SyncRequest>,
        selection: SelectionChange,
    },
    /// Dropped where it started
    NoOp,
    /// Dropped outside any container
    Cancelled,
    /// Not applied; state unchanged
    Rejected(BoardError),
}

/// Owns the current board and everything derived from it
pub struct BoardSession {
    state: BoardState,
    engine: MoveEngine,
    filter: FilterPredicate,
    filter_mode: FilterMode,
    selection: Selection,
    sync: SyncQueue,
    notifications: Option<UnboundedSender<Notification>>,
}

impl BoardSession {
    /// Create a session with default policies
    pub fn new(state: BoardState, sync: Arc<dyn SyncAdapter>) -> Self {
        Self {
            state,
            engine: MoveEngine::default(),
            filter: FilterPredicate::default(),
            filter_mode: FilterMode::default(),
            selection: Selection::new(),
            sync: SyncQueue::new(sync),
            notifications: None,
        }
    }

    /// Take policies from configuration
    pub fn with_config(mut self, config: &BoardConfig) -> Self {
        self.engine = MoveEngine::new(config.persist_policy);
        self.filter_mode = config.filter_mode;
        self
    }

    /// Surface non-fatal events on a channel
    pub fn with_notifications(mut self, sender: UnboundedSender<Notification>) -> Self {
        self.notifications = Some(sender);
        self
    }

    /// The current state
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    // =========================================================================
    // Moves
    // =========================================================================

    /// Handle the end of a drag gesture. `None` means the item was dropped
    /// outside any container.
    pub fn handle_drag_end(&mut self, intent: Option<MoveIntent>) -> MoveReport {
        let Some(intent) = intent else {
            debug!("drag cancelled");
            return MoveReport::Cancelled;
        };

        let outcome = match self.engine.apply(&self.state, &intent) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(
                    kind = ?intent.kind,
                    dragged = %intent.dragged_item_id,
                    error = %error,
                    "move rejected"
                );
                self.notify(Notification::MoveRejected(error.clone()));
                return MoveReport::Rejected(error);
            }
        };

        if outcome.is_noop() {
            return MoveReport::NoOp;
        }

        self.state = outcome.state;
        let selection = self.reconcile_selection();
        self.sync.submit(outcome.changes.clone());

        MoveReport::Applied {
            changes: outcome.changes,
            selection,
        }
    }

    /// Wait for every change handed to sync so far
    pub async fn flush(&mut self) {
        self.sync.flush().await;
    }

    // =========================================================================
    // Edits from other collaborators
    // =========================================================================

    /// Apply an edit to the state atomically.
    ///
    /// The edit runs against a copy; the copy is installed only if the edit
    /// succeeds and the ordering invariants still hold.
    pub fn apply_edit<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut BoardState) -> Result<()>,
    {
        let mut next = self.state.clone();
        if let Err(error) = edit(&mut next).and_then(|()| next.check_invariants()) {
            warn!(error = %error, "edit rejected");
            self.notify(Notification::EditRejected(error.clone()));
            return Err(error);
        }

        self.state = next;
        self.reconcile_selection();
        Ok(())
    }

    /// Replace the state with a freshly hydrated one
    pub fn reload(&mut self, state: BoardState) {
        self.state = state;
        self.reconcile_selection();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Open a card's detail view. False if the card does not exist.
    pub fn open_card(&mut self, id: CardId) -> bool {
        self.selection.open(&self.state, id)
    }

    /// Close the detail view
    pub fn close_card(&mut self) {
        self.selection.close();
    }

    /// Current copy of the open card
    pub fn selected_card(&self) -> Option<&Card> {
        self.selection.card()
    }

    fn reconcile_selection(&mut self) -> SelectionChange {
        let change = self.selection.reconcile(&self.state);
        if let SelectionChange::Closed(id) = change {
            self.notify(Notification::SelectionClosed(id));
        }
        change
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// The active filter
    pub fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    /// Match card titles containing `name`, ignoring case
    pub fn set_name_filter(&mut self, name: impl Into<String>) {
        self.filter.set_name(name);
    }

    /// Add `label` to the set a card may carry to pass
    pub fn add_label_filter(&mut self, label: LabelId) {
        self.filter.add_label(label);
    }

    /// Stop matching on `label`
    pub fn remove_label_filter(&mut self, label: LabelId) {
        self.filter.remove_label(label);
    }

    /// Show every card again
    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    /// Cards passing the current filter, column by column
    pub fn visible_cards(&self) -> Vec<&Card> {
        filter::visible(self.state.cards(), &self.filter, self.filter_mode)
    }

    /// Columns with only their visible cards
    pub fn visible_board(&self) -> Vec<Column> {
        filter::visible_board(&self.state, &self.filter, self.filter_mode)
    }

    fn notify(&self, notification: Notification) {
        if let Some(sender) = &self.notifications {
            // A closed receiver just means nobody is listening
            let _ = sender.send(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::sync::RecordingSync;
    use crate::types::{Board, BoardId, Card, Column, ColumnId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::{mpsc, Mutex};

    /// Remote whose first write is slow to land
    #[derive(Default)]
    struct StallingSync {
        calls: AtomicUsize,
        landed: Mutex<Vec<SyncRequest>>,
    }

    #[async_trait]
    impl SyncAdapter for StallingSync {
        async fn apply(&self, request: &SyncRequest) -> std::result::Result<(), SyncError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.landed.lock().await.push(request.clone());
            Ok(())
        }
    }

    fn state() -> BoardState {
        BoardState::new(Board::new(1, "Test")).with_columns([
            Column::new(1, "A", BoardId(1))
                .with_drag_id("A")
                .with_cards([
                    Card::new(11, "one", ColumnId(1)).with_drag_id("c11"),
                    Card::new(12, "two", ColumnId(1)).with_drag_id("c12"),
                ]),
            Column::new(2, "B", BoardId(1)).with_drag_id("B"),
        ])
    }

    #[tokio::test]
    async fn test_applied_move_dispatches_changes() {
        let sync = Arc::new(RecordingSync::new());
        let mut session = BoardSession::new(state(), sync.clone());

        let report = session.handle_drag_end(Some(MoveIntent::card("c11", ("A", 0), ("B", 0))));
        let MoveReport::Applied { changes, .. } = report else {
            panic!("expected applied, got {:?}", report);
        };
        assert_eq!(changes.len(), 1);

        session.flush().await;
        assert_eq!(sync.requests().await, changes);
        assert_eq!(
            session.state().find_card(CardId(11)).unwrap().column_id,
            ColumnId(2)
        );
    }

    #[tokio::test]
    async fn test_back_to_back_moves_land_in_order() {
        let sync = Arc::new(StallingSync::default());
        let mut session = BoardSession::new(state(), sync.clone());

        session.handle_drag_end(Some(MoveIntent::card("c11", ("A", 0), ("A", 1))));
        session.handle_drag_end(Some(MoveIntent::card("c11", ("A", 1), ("A", 0))));
        session.flush().await;

        let landed = sync.landed.lock().await.clone();
        let positions: Vec<_> = landed
            .iter()
            .map(|request| match request {
                SyncRequest::UpdateCard { id, position, .. } => (*id, *position),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(positions, vec![(CardId(11), 1), (CardId(11), 0)]);
        assert_eq!(session.state().columns[0].cards[0].id, CardId(11));
    }

    #[tokio::test]
    async fn test_cancelled_and_noop_do_nothing() {
        let sync = Arc::new(RecordingSync::new());
        let mut session = BoardSession::new(state(), sync.clone());

        assert_eq!(session.handle_drag_end(None), MoveReport::Cancelled);
        assert_eq!(
            session.handle_drag_end(Some(MoveIntent::card("c11", ("A", 0), ("A", 0)))),
            MoveReport::NoOp
        );

        session.flush().await;
        assert!(sync.requests().await.is_empty());
        assert_eq!(session.state(), &state());
    }

    #[tokio::test]
    async fn test_rejected_move_notifies() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sync = Arc::new(RecordingSync::new());
        let mut session = BoardSession::new(state(), sync.clone()).with_notifications(tx);

        let report = session.handle_drag_end(Some(MoveIntent::card("c11", ("A", 0), ("Q", 0))));
        assert!(matches!(report, MoveReport::Rejected(BoardError::ColumnNotFound { .. })));
        assert!(matches!(
            rx.try_recv().unwrap(),
            Notification::MoveRejected(BoardError::ColumnNotFound { .. })
        ));
        assert_eq!(session.state(), &state());
    }

    #[tokio::test]
    async fn test_failed_sync_keeps_local_state() {
        let sync = Arc::new(RecordingSync::failing());
        let mut session = BoardSession::new(state(), sync.clone());

        session.handle_drag_end(Some(MoveIntent::card("c12", ("A", 1), ("A", 0))));
        session.flush().await;

        assert_eq!(sync.requests().await.len(), 1);
        assert_eq!(session.state().columns[0].cards[0].id, CardId(12));
    }

    #[tokio::test]
    async fn test_edit_removing_open_card_closes_selection() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session =
            BoardSession::new(state(), Arc::new(RecordingSync::new())).with_notifications(tx);

        assert!(session.open_card(CardId(12)));
        session
            .apply_edit(|state| state.remove_card(CardId(12)).map(|_| ()))
            .unwrap();

        assert!(session.selected_card().is_none());
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::SelectionClosed(CardId(12))
        );
    }

    #[tokio::test]
    async fn test_failed_edit_is_atomic() {
        let mut session = BoardSession::new(state(), Arc::new(RecordingSync::new()));
        let result = session.apply_edit(|state| {
            state.remove_card(CardId(11))?;
            state.remove_card(CardId(99))?;
            Ok(())
        });

        assert!(result.unwrap_err().is_not_found());
        assert!(session.state().find_card(CardId(11)).is_some());
    }

    #[tokio::test]
    async fn test_filters_drive_visible_cards() {
        let mut session = BoardSession::new(state(), Arc::new(RecordingSync::new()));
        assert_eq!(session.visible_cards().len(), 2);

        session.set_name_filter("TWO");
        let visible: Vec<_> = session.visible_cards().iter().map(|c| c.id).collect();
        assert_eq!(visible, vec![CardId(12)]);

        session.add_label_filter(LabelId(1));
        assert!(session.visible_cards().is_empty());
        assert_eq!(session.visible_board().len(), 2);

        session.clear_filters();
        assert!(!session.filter().is_active());
    }
}
