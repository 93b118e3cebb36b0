//! SQLite backend for the Stackr catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Stacks are stored one row per
//! document, with the embedded creator snapshot, technologies and review log
//! kept as JSON columns.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
