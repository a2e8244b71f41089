//! # Dramlog Architecture
//!
//! Dramlog is a **UI-agnostic tasting diary library**. A mobile or desktop shell renders the
//! screens; this crate owns the records, the search, and the decoded-image cache behind them.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (not part of this crate)                      │
//! │  - Layout, gestures, navigation, image orientation/resizing │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - DiaryApi facade, the only entry point                    │
//! │  - Holds the active view (browsing vs. searching)           │
//! │  - Batch delete, thumbnails, async image fetch              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create, list, search, update, delete                     │
//! │  - Returns structured `CmdResult`s, never prints            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore trait                                        │
//! │  - SqliteStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The image cache ([`cache::ImageCache`]) sits beside the stack: the facade feeds it on
//! writes and reads thumbnails from it.
//!
//! ## Identity and Ordering
//!
//! Every entry gets a generated [`model::EntryId`] on creation. The tasting `date` is only a
//! display and sort attribute. Every listing, full or filtered, is ordered by `date`
//! descending, with ties broken by creation order (newest first).
//!
//! ## Module Overview
//!
//! - [`api`]: The facade and its active view
//! - [`commands`]: One module per diary operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `DiaryEntry`, `EntryFields`, `EntryId`
//! - [`search`]: Case and diacritic folding used by every store
//! - [`view`]: The browsing/searching state machine
//! - [`cache`]: Bounded decoded-image cache with async fetch
//! - [`config`]: Layered configuration
//! - [`error`]: Error types

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod store;
pub mod view;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
