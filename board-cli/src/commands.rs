//! Subcommand implementations

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use swissarmyhammer_board::{
    snapshot::{hydrate, BoardResponse},
    BoardConfig, BoardSession, BoardState, DragId, LabelId, MoveIntent, MoveReport, OutboxSync,
};
use tracing::info;

use crate::cli::OutputFormat;

/// Read and hydrate a board-fetch snapshot
pub async fn load_snapshot(path: &Path) -> Result<BoardState> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let response = BoardResponse::from_json(&body)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    hydrate(response).with_context(|| format!("loading snapshot {}", path.display()))
}

/// Write a state back in board-fetch form
pub async fn save_snapshot(path: &Path, state: &BoardState) -> Result<()> {
    let body = BoardResponse::from(state).to_json()?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("writing snapshot {}", path.display()))?;
    Ok(())
}

fn session(state: BoardState, config: &BoardConfig) -> BoardSession {
    let outbox = Arc::new(OutboxSync::new(&config.outbox_path));
    BoardSession::new(state, outbox).with_config(config)
}

/// Render the filtered board
pub fn show(
    state: BoardState,
    config: &BoardConfig,
    name: Option<String>,
    labels: Vec<u64>,
    format: OutputFormat,
) -> Result<String> {
    let mut session = session(state, config);
    if let Some(name) = name {
        session.set_name_filter(name);
    }
    for label in labels {
        session.add_label_filter(LabelId(label));
    }

    let visible = BoardState {
        columns: session.visible_board(),
        ..session.state().clone()
    };
    let response = BoardResponse::from(&visible);

    Ok(match format {
        OutputFormat::Json => response.to_json()?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(&response)?,
    })
}

/// Move a column, then persist the snapshot and queue the sync request
pub async fn move_column(
    snapshot: &Path,
    config: &BoardConfig,
    column: String,
    to_index: usize,
) -> Result<String> {
    let state = load_snapshot(snapshot).await?;
    let drag_id = DragId::from(column);
    let from_index = state
        .find_column_by_drag_id(&drag_id)
        .map(|c| c.position)
        .with_context(|| format!("no column with drag id {}", drag_id))?;

    let intent = MoveIntent::column(drag_id, from_index, to_index);
    apply(snapshot, session(state, config), intent).await
}

/// Move a card, then persist the snapshot and queue the sync request
pub async fn move_card(
    snapshot: &Path,
    config: &BoardConfig,
    card: String,
    from: String,
    to: String,
    to_index: usize,
) -> Result<String> {
    let state = load_snapshot(snapshot).await?;
    let drag_id = DragId::from(card);
    let from = DragId::from(from);
    let from_index = state
        .find_column_by_drag_id(&from)
        .and_then(|c| c.find_card_by_drag_id(&drag_id))
        .map(|c| c.position)
        .with_context(|| format!("no card {} in column {}", drag_id, from))?;

    let intent = MoveIntent::card(drag_id, (from, from_index), (to, to_index));
    apply(snapshot, session(state, config), intent).await
}

async fn apply(snapshot: &Path, mut session: BoardSession, intent: MoveIntent) -> Result<String> {
    match session.handle_drag_end(Some(intent)) {
        MoveReport::Applied { changes, .. } => {
            session.flush().await;
            save_snapshot(snapshot, session.state()).await?;
            info!(queued = changes.len(), "move applied");
            Ok(serde_json::to_string_pretty(&changes)?)
        }
        MoveReport::NoOp | MoveReport::Cancelled => Ok("[]".to_string()),
        MoveReport::Rejected(error) => bail!(error),
    }
}

/// List queued sync requests, newest first
pub async fn outbox(config: &BoardConfig, limit: Option<usize>) -> Result<String> {
    let entries = OutboxSync::new(&config.outbox_path).read(limit).await?;
    let lines = entries
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swissarmyhammer_board::{CardId, ColumnId};
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "kanban": {"id": 1, "name": "Demo", "idMemberCreator": 1,
                   "labels": [{"id": 7, "text": "bug", "color": "eb5a46"}]},
        "columns": [
            {"id": 1, "uuid": "todo", "name": "To Do", "idKanban": 1, "position": 0, "items": [
                {"id": 10, "uuid": "k10", "title": "fix login", "position": 0,
                 "labels": [{"label__id": 7, "label__text": "bug", "label__color": "eb5a46"}]},
                {"id": 11, "uuid": "k11", "title": "write docs", "position": 1}
            ]},
            {"id": 2, "uuid": "done", "name": "Done", "idKanban": 1, "position": 1, "items": []}
        ]
    }"#;

    fn setup() -> (TempDir, std::path::PathBuf, BoardConfig) {
        let temp = TempDir::new().unwrap();
        let snapshot = temp.path().join("board.json");
        std::fs::write(&snapshot, SNAPSHOT).unwrap();
        let config = BoardConfig {
            outbox_path: temp.path().join("outbox.jsonl"),
            ..Default::default()
        };
        (temp, snapshot, config)
    }

    #[tokio::test]
    async fn test_move_card_rewrites_snapshot_and_queues() {
        let (_temp, snapshot, config) = setup();

        move_card(&snapshot, &config, "k11".into(), "todo".into(), "done".into(), 0)
            .await
            .unwrap();

        let state = load_snapshot(&snapshot).await.unwrap();
        assert_eq!(state.find_card(CardId(11)).unwrap().column_id, ColumnId(2));
        assert!(state.check_invariants().is_ok());

        let queued = outbox(&config, None).await.unwrap();
        assert_eq!(queued.lines().count(), 1);
        assert!(queued.contains("update-card"));
    }

    #[tokio::test]
    async fn test_move_column_unknown_drag_id_fails() {
        let (_temp, snapshot, config) = setup();
        assert!(move_column(&snapshot, &config, "nope".into(), 0)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_show_filters_by_label() {
        let (_temp, snapshot, config) = setup();
        let state = load_snapshot(&snapshot).await.unwrap();

        let out = show(state, &config, Some("docs".into()), vec![7], OutputFormat::Json).unwrap();
        let response = BoardResponse::from_json(&out).unwrap();

        assert_eq!(response.columns.len(), 2);
        assert_eq!(response.columns[0].items.len(), 1);
        assert_eq!(response.columns[0].items[0].title, "fix login");
    }
}
