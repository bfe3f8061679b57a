//! SQLite-backed document store for therapy analyses, patient-flow funnels,
//! and status checks.
//!
//! Records are stored as JSON documents keyed by their generated string id,
//! one table per collection. Writes are last-write-wins; there is no
//! optimistic concurrency discipline beyond the connection mutex.

mod documents;
mod schema;

pub use documents::DocumentStore;
