//! Visit logging for resolved hosts.
//!
//! Visits are an append-only side effect of resolution. The [`VisitSink`]
//! turns resolution events into [`VisitRecord`]s and hands them to a
//! [`VisitStore`].

pub mod error;
pub mod memory;
pub mod sink;
pub mod sqlite;
pub mod visit;

pub use error::{Result, StorageError};
pub use memory::InMemoryVisitStore;
pub use sink::VisitSink;
pub use sqlite::SqliteVisitStore;
pub use visit::{VisitRecord, VisitStore, UNKNOWN_LOCATION};
