//! # Command Layer
//!
//! This module contains the **core logic** of each diary operation. Each command lives in
//! its own submodule and works on domain types only.
//!
//! ## Role and Responsibilities
//!
//! - Build entries (`create` assigns the id and the date)
//! - Sequence store calls and decide how failures surface
//! - Return structured [`CmdResult`]s with affected entries and messages
//!
//! ## Failure Policy
//!
//! Writes (`create`, `update`, `delete`) return the store's error unchanged; nothing is
//! retried. Reads (`list`, `search`) never fail: a store error is logged and turned into an
//! empty listing with a warning message, so a broken store shows as an empty diary instead
//! of an error screen.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any presentation**: No formatting, layout, or user prompts
//! - **View state**: Which list is on screen is the facade's business
//!
//! ## Command Modules
//!
//! - [`create`]: Create a new entry
//! - [`list`]: List every entry
//! - [`search`]: Filter entries by name
//! - [`update`]: Overwrite an entry
//! - [`delete`]: Remove an entry

use crate::model::DiaryEntry;
use serde::Serialize;

pub mod create;
pub mod delete;
pub mod list;
pub mod search;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<DiaryEntry>,
    pub listed_entries: Vec<DiaryEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_entries(mut self, entries: Vec<DiaryEntry>) -> Self {
        self.affected_entries = entries;
        self
    }

    pub fn with_listed_entries(mut self, entries: Vec<DiaryEntry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }

    /// Folds another result's entries and messages into this one.
    pub fn merge(&mut self, other: CmdResult) {
        self.affected_entries.extend(other.affected_entries);
        self.listed_entries.extend(other.listed_entries);
        self.messages.extend(other.messages);
    }
}

/// Label used in messages: the entry name, or a placeholder for unnamed entries.
pub(crate) fn display_name(entry: &DiaryEntry) -> &str {
    entry.name().unwrap_or("(untitled)")
}
