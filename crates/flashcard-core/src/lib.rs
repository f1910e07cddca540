//! Card store and study logic for data-engineering flashcards.
//!
//! This crate provides:
//! - A SQLite-backed card store with a learning/reviewing/mastered state per card
//! - Session selection (priority-filtered or random draw)
//! - Per-category progress summaries
//! - Import from and tally push-back to a remote question bank

pub mod db;
pub mod models;
pub mod progress;
pub mod seed;
pub mod selector;
pub mod sync;

// Re-exports
pub use db::{CardStore, DbError, DbResult};
pub use models::{Card, CardId, CardState, CategorySummary, Difficulty, NewCard, ProgressModel, Tally};
pub use progress::{overall, percentage};
pub use selector::{Answer, Session, SessionMode, SessionPlan, SessionSelector};
pub use sync::{HttpRemoteBank, RemoteBank, RemoteQuestion, RemoteSettings, SyncError, SyncOutcome};
