//! An in-process executor over plain row vectors.
//!
//! It evaluates the subset of `SELECT` that paginated queries produce:
//! comparisons, `AND`/`OR`/`NOT`, multi-key `ORDER BY` and `LIMIT`/`OFFSET`.
//! Used by tests.

pub mod db;
pub mod eval;

pub use db::MemoryDb;
