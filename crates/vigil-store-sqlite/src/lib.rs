//! SQLite backend for the vigil crime-reporting store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That single connection also serialises
//! multi-step operations: each store method performs its reads and writes
//! inside one `call` closure, so check-then-insert sequences cannot
//! interleave with another request's.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
