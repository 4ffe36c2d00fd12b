//! Fusion orchestrator: concurrent source fan-out, aggregation, ranking.
//!
//! This module fans out to every evidence source concurrently under a
//! per-source time budget, folds their results in the fixed order
//! knowledge, search, store, and returns a sorted, truncated trope list.

pub mod aggregate;
pub mod fanout;
pub mod identify;
pub mod rank;
