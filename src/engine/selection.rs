// src/engine/selection.rs
//
// Batch-selection set for target reassignment.

use std::collections::BTreeSet;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::status::{is_selectable, Bucket};
use crate::models::WorkItem;

/// Observable selection state. `Selecting` is entered on the first insert and
/// left as soon as the set becomes empty again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionMode {
    Idle,
    Selecting { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Ignored,
}

#[derive(Debug)]
pub struct SelectionSet {
    members: BTreeSet<i64>,
    mode: watch::Sender<SelectionMode>,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSet {
    pub fn new() -> Self {
        let (mode, _) = watch::channel(SelectionMode::Idle);
        Self {
            members: BTreeSet::new(),
            mode,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionMode> {
        self.mode.subscribe()
    }

    pub fn mode(&self) -> SelectionMode {
        *self.mode.borrow()
    }

    pub fn contains(&self, item_id: i64) -> bool {
        self.members.contains(&item_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.members.iter().copied()
    }

    /// Removes `item_id` if present; otherwise adds it when it is selectable in
    /// `items` under `viewing`.
    pub fn toggle(&mut self, item_id: i64, items: &[WorkItem], viewing: Bucket) -> ToggleOutcome {
        if self.members.remove(&item_id) {
            self.publish();
            return ToggleOutcome::Removed;
        }

        let eligible = items
            .iter()
            .find(|i| i.item_id == item_id)
            .is_some_and(|i| is_selectable(i, viewing));
        if !eligible {
            debug!(item_id, "ignoring toggle for unselectable target");
            return ToggleOutcome::Ignored;
        }

        self.members.insert(item_id);
        self.publish();
        ToggleOutcome::Added
    }

    pub fn select_all_eligible(&mut self, items: &[WorkItem], viewing: Bucket) {
        let eligible = eligible_ids(items, viewing);
        if eligible != self.members {
            self.members = eligible;
            self.publish();
        }
    }

    pub fn is_all_selected(&self, items: &[WorkItem], viewing: Bucket) -> bool {
        let eligible = eligible_ids(items, viewing);
        !eligible.is_empty() && eligible == self.members
    }

    /// Select-all / deselect-all affordance.
    pub fn toggle_all(&mut self, items: &[WorkItem], viewing: Bucket) {
        if self.is_all_selected(items, viewing) {
            self.clear();
        } else {
            self.select_all_eligible(items, viewing);
        }
    }

    /// Drops members that no longer satisfy the predicate against `items`.
    pub fn retain_eligible(&mut self, items: &[WorkItem], viewing: Bucket) {
        let eligible = eligible_ids(items, viewing);
        let before = self.members.len();
        self.members.retain(|id| eligible.contains(id));
        if self.members.len() != before {
            self.publish();
        }
    }

    pub fn clear(&mut self) {
        if !self.members.is_empty() {
            self.members.clear();
            self.publish();
        }
    }

    fn publish(&self) {
        let next = match self.members.len() {
            0 => SelectionMode::Idle,
            count => SelectionMode::Selecting { count },
        };
        self.mode.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

fn eligible_ids(items: &[WorkItem], viewing: Bucket) -> BTreeSet<i64> {
    items
        .iter()
        .filter(|i| is_selectable(i, viewing))
        .map(|i| i.item_id)
        .collect()
}
