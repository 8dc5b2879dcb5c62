//! Visible-card projection.
//!
//! Filtering never reorders or mutates anything; it only decides which cards
//! are shown.

use crate::state::BoardState;
use crate::types::{Card, Column, LabelId};
use serde::{Deserialize, Serialize};

/// How the name and label predicates combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// An active label filter wins and the name filter is ignored
    #[default]
    LabelPrecedence,
    /// Both filters must match when both are active
    All,
}

/// The user's current filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Case-insensitive title substring
    #[serde(default)]
    pub name_substring: String,
    #[serde(default)]
    pub label_ids: Vec<LabelId>,
}

impl FilterPredicate {
    /// Empty filter, shows everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = LabelId>) -> Self {
        for label in labels {
            self.add_label(label);
        }
        self
    }

    /// Replace the name filter
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name_substring = name.into();
    }

    /// Add a label to the label filter. Adding one twice keeps one copy.
    pub fn add_label(&mut self, label: LabelId) {
        if !self.label_ids.contains(&label) {
            self.label_ids.push(label);
        }
    }

    /// Remove a label from the label filter
    pub fn remove_label(&mut self, label: LabelId) {
        self.label_ids.retain(|l| *l != label);
    }

    /// Reset to the empty filter
    pub fn clear(&mut self) {
        self.name_substring.clear();
        self.label_ids.clear();
    }

    /// True when any predicate is set
    pub fn is_active(&self) -> bool {
        !self.name_substring.is_empty() || !self.label_ids.is_empty()
    }

    /// Whether a single card passes
    pub fn matches(&self, card: &Card, mode: FilterMode) -> bool {
        let by_label = !self.label_ids.is_empty();
        let by_name = !self.name_substring.is_empty();

        match (by_label, by_name, mode) {
            (false, false, _) => true,
            (true, _, FilterMode::LabelPrecedence) | (true, false, FilterMode::All) => {
                card.has_any_label(&self.label_ids)
            }
            (true, true, FilterMode::All) => {
                card.has_any_label(&self.label_ids) && card.title_contains(&self.name_substring)
            }
            (false, true, _) => card.title_contains(&self.name_substring),
        }
    }
}

/// Cards that pass `predicate`, in input order
pub fn visible<'a>(
    cards: impl IntoIterator<Item = &'a Card>,
    predicate: &FilterPredicate,
    mode: FilterMode,
) -> Vec<&'a Card> {
    cards
        .into_iter()
        .filter(|card| predicate.matches(card, mode))
        .collect()
}

/// The board's columns with only their visible cards.
///
/// Columns are always kept, even when none of their cards pass, and cards
/// keep their stored positions.
pub fn visible_board(
    state: &BoardState,
    predicate: &FilterPredicate,
    mode: FilterMode,
) -> Vec<Column> {
    state
        .columns
        .iter()
        .map(|column| Column {
            cards: visible(&column.cards, predicate, mode)
                .into_iter()
                .cloned()
                .collect(),
            ..column.clone()
        })
        .collect()
}
