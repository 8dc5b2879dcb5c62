//! End-to-end drag scenarios through a board session

use std::sync::Arc;
use swissarmyhammer_board::{
    snapshot::{hydrate, BoardResponse},
    Board, BoardId, BoardSession, BoardState, Card, CardId, Column, ColumnId, FilterMode,
    FilterPredicate, LabelId, MoveIntent, MoveReport, PersistPolicy, RecordingSync,
    SelectionChange, SyncRequest,
};

fn three_cards() -> BoardState {
    BoardState::new(Board::new(1, "Sprint")).with_columns([
        Column::new(1, "A", BoardId(1)).with_drag_id("A").with_cards([
            Card::new(1, "c1", ColumnId(1)).with_drag_id("c1"),
            Card::new(2, "c2", ColumnId(1)).with_drag_id("c2"),
            Card::new(3, "c3", ColumnId(1)).with_drag_id("c3"),
        ]),
        Column::new(2, "B", BoardId(1)).with_drag_id("B"),
        Column::new(3, "C", BoardId(1)).with_drag_id("C"),
    ])
}

fn titles(state: &BoardState, column: u64) -> Vec<(String, usize)> {
    state
        .find_column(ColumnId(column))
        .unwrap()
        .cards
        .iter()
        .map(|c| (c.title.clone(), c.position))
        .collect()
}

#[tokio::test]
async fn test_same_column_move_to_top() {
    let sync = Arc::new(RecordingSync::new());
    let mut session = BoardSession::new(three_cards(), sync.clone());

    session.handle_drag_end(Some(MoveIntent::card("c3", ("A", 2), ("A", 0))));
    session.flush().await;

    assert_eq!(
        titles(session.state(), 1),
        vec![
            ("c3".to_string(), 0),
            ("c1".to_string(), 1),
            ("c2".to_string(), 2)
        ]
    );
    let requests = sync.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(matches!(
        requests[0],
        SyncRequest::UpdateCard { id: CardId(3), position: 0, .. }
    ));
}

#[tokio::test]
async fn test_cross_column_move_into_empty_column() {
    let state = BoardState::new(Board::new(1, "Sprint")).with_columns([
        Column::new(1, "A", BoardId(1)).with_drag_id("A").with_cards([
            Card::new(1, "c1", ColumnId(1)).with_drag_id("c1"),
            Card::new(2, "c2", ColumnId(1)).with_drag_id("c2"),
        ]),
        Column::new(2, "B", BoardId(1)).with_drag_id("B"),
    ]);
    let sync = Arc::new(RecordingSync::new());
    let mut session = BoardSession::new(state, sync.clone());

    session.handle_drag_end(Some(MoveIntent::card("c1", ("A", 0), ("B", 0))));
    session.flush().await;

    assert_eq!(titles(session.state(), 1), vec![("c2".to_string(), 0)]);
    assert_eq!(titles(session.state(), 2), vec![("c1".to_string(), 0)]);
    assert_eq!(
        sync.requests().await,
        vec![SyncRequest::UpdateCard {
            id: CardId(1),
            title: "c1".to_string(),
            text_description: String::new(),
            column_id: ColumnId(2),
            position: 0,
        }]
    );
}

#[tokio::test]
async fn test_column_reorder_persists_only_moved_column() {
    let sync = Arc::new(RecordingSync::new());
    let mut session = BoardSession::new(three_cards(), sync.clone());

    session.handle_drag_end(Some(MoveIntent::column("C", 2, 0)));
    session.flush().await;

    let order: Vec<_> = session
        .state()
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.position))
        .collect();
    assert_eq!(order, vec![("C", 0), ("A", 1), ("B", 2)]);
    assert_eq!(
        sync.requests().await,
        vec![SyncRequest::UpdateColumn {
            id: ColumnId(3),
            position: 0
        }]
    );
}

#[tokio::test]
async fn test_all_changed_policy_persists_shifted_siblings() {
    let config = swissarmyhammer_board::BoardConfig {
        persist_policy: PersistPolicy::AllChanged,
        ..Default::default()
    };
    let sync = Arc::new(RecordingSync::new());
    let mut session = BoardSession::new(three_cards(), sync.clone()).with_config(&config);

    session.handle_drag_end(Some(MoveIntent::column("C", 2, 0)));
    session.flush().await;

    let requests = sync.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[0],
        SyncRequest::UpdateColumn {
            id: ColumnId(3),
            position: 0
        }
    );
}

#[tokio::test]
async fn test_label_filter_wins_over_name() {
    let state = BoardState::new(Board::new(1, "Sprint")).with_columns([Column::new(
        1,
        "A",
        BoardId(1),
    )
    .with_cards([
        Card::new(1, "foo only", ColumnId(1)),
        Card::new(2, "labelled", ColumnId(1)).with_labels([LabelId(7)]),
    ])]);
    let mut session = BoardSession::new(state, Arc::new(RecordingSync::new()));

    session.set_name_filter("foo");
    session.add_label_filter(LabelId(7));

    let visible: Vec<_> = session.visible_cards().iter().map(|c| c.id).collect();
    assert_eq!(visible, vec![CardId(2)]);

    let strict = FilterPredicate::new().with_name("foo").with_labels([LabelId(7)]);
    let strict_visible =
        swissarmyhammer_board::filter::visible(session.state().cards(), &strict, FilterMode::All);
    assert!(strict_visible.is_empty());
}

#[tokio::test]
async fn test_open_card_follows_moves() {
    let mut session = BoardSession::new(three_cards(), Arc::new(RecordingSync::new()));
    assert!(session.open_card(CardId(1)));

    let report = session.handle_drag_end(Some(MoveIntent::card("c1", ("A", 0), ("C", 0))));
    let MoveReport::Applied { selection, .. } = report else {
        panic!("expected applied, got {:?}", report);
    };
    assert!(matches!(selection, SelectionChange::Refreshed(_)));

    let open = session.selected_card().unwrap();
    assert_eq!(open.column_id, ColumnId(3));
    assert_eq!(open.position, 0);
    session.flush().await;
}

#[tokio::test]
async fn test_stale_intent_after_reload_is_rejected() {
    let mut session = BoardSession::new(three_cards(), Arc::new(RecordingSync::new()));
    assert!(session.open_card(CardId(3)));

    // Another client deleted column A; a fresh fetch no longer has it
    let mut fresh = three_cards();
    fresh.remove_column(ColumnId(1)).unwrap();
    session.reload(fresh.clone());
    assert!(session.selected_card().is_none());

    let report = session.handle_drag_end(Some(MoveIntent::card("c3", ("A", 2), ("B", 0))));
    assert!(matches!(report, MoveReport::Rejected(_)));
    assert_eq!(session.state(), &fresh);
}

#[tokio::test]
async fn test_hydrated_board_accepts_moves() {
    let body = r#"{
        "kanban": {"id": 9, "name": "Ops", "idMemberCreator": 2, "labels": []},
        "columns": [
            {"id": 1, "uuid": "todo", "name": "To Do", "idKanban": 9, "position": 0, "items": [
                {"id": 10, "uuid": "t-10", "title": "deploy", "position": 0},
                {"id": 11, "uuid": "t-11", "title": "rollback", "position": 3}
            ]},
            {"id": 2, "uuid": "done", "name": "Done", "idKanban": 9, "position": 1, "items": []}
        ]
    }"#;
    let state = hydrate(BoardResponse::from_json(body).unwrap()).unwrap();
    let sync = Arc::new(RecordingSync::new());
    let mut session = BoardSession::new(state, sync.clone());

    session.handle_drag_end(Some(MoveIntent::card("t-11", ("todo", 1), ("done", 5))));
    session.flush().await;

    assert!(session.state().check_invariants().is_ok());
    assert_eq!(titles(session.state(), 2), vec![("rollback".to_string(), 0)]);
    assert_eq!(sync.requests().await.len(), 1);
}
