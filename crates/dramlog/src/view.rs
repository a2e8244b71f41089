//! # Active View
//!
//! The facade keeps two lists in memory: the full diary and the results of the most recent
//! search. Which one is on screen depends on a two-state machine:
//!
//! ```text
//!            search(term) with term non-empty AND results non-empty
//!   Browsing ─────────────────────────────────────────────────────▶ Searching
//!      ▲                                                              │
//!      └────────── term cleared / cancel / search with no results ────┘
//! ```
//!
//! A search that finds nothing keeps showing the full diary. Both lists hold the same
//! ordering as the store (date descending), and entries removed by a successful delete are
//! dropped from both.

use crate::model::{DiaryEntry, EntryId};
use crate::search;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Browsing,
    Searching,
}

#[derive(Debug, Clone)]
struct SearchState {
    term: String,
    results: Vec<DiaryEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveView {
    all: Vec<DiaryEntry>,
    search: Option<SearchState>,
}

impl ActiveView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        match &self.search {
            Some(state) if !state.results.is_empty() => ViewMode::Searching,
            _ => ViewMode::Browsing,
        }
    }

    /// The list currently on screen.
    pub fn entries(&self) -> &[DiaryEntry] {
        match (&self.search, self.mode()) {
            (Some(state), ViewMode::Searching) => &state.results,
            _ => &self.all,
        }
    }

    pub fn all_entries(&self) -> &[DiaryEntry] {
        &self.all
    }

    /// The active search term, if a non-empty one was supplied.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.term.as_str())
    }

    pub fn set_all(&mut self, entries: Vec<DiaryEntry>) {
        self.all = entries;
    }

    /// Records a search. A term that folds to nothing (empty, or only combining marks)
    /// leaves search mode.
    pub fn set_search(&mut self, term: &str, results: Vec<DiaryEntry>) {
        if search::fold(term).is_empty() {
            self.search = None;
        } else {
            self.search = Some(SearchState {
                term: term.to_string(),
                results,
            });
        }
    }

    pub fn cancel_search(&mut self) {
        self.search = None;
    }

    /// Maps positions in the visible list to entry ids. Out-of-range positions are skipped.
    pub fn resolve_positions(&self, positions: &[usize]) -> Vec<EntryId> {
        let visible = self.entries();
        let mut ids = Vec::with_capacity(positions.len());
        for &position in positions {
            if let Some(entry) = visible.get(position) {
                if !ids.contains(&entry.id) {
                    ids.push(entry.id);
                }
            }
        }
        ids
    }

    /// Drops an entry from both lists.
    pub fn remove(&mut self, id: &EntryId) {
        self.all.retain(|e| e.id != *id);
        if let Some(state) = &mut self.search {
            state.results.retain(|e| e.id != *id);
        }
    }
}
