//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define storage-level task contracts.
//! - Isolate SQLite query details from data sources and view-models.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
