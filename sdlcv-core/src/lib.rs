//! Domain model for sdlcv - SDLC verification workflow.
//!
//! This crate holds everything the TUI binary shares with tests and tooling:
//! the analysis data model (`types`), the overall-score aggregator (`score`),
//! the error taxonomy (`error`), and the WAL-mode SQLite auth-session store
//! (`db` + `schema`). No terminal or HTTP code lives here.

pub mod db;
pub mod error;
pub mod schema;
pub mod score;
pub mod types;
