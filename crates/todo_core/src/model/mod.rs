//! Domain model for the task screens.
//!
//! # Responsibility
//! - Define the `Task` record and the list visibility filter.
//!
//! # Invariants
//! - Every task is identified by a stable, non-empty text id.
//! - Filtering never reorders tasks.

pub mod filter;
pub mod task;
