//! Valve storage
//!
//! A single relational table behind an SQLite connection pool.
//!
//! ```text
//! ┌──────────────┐   session()   ┌─────────────────────────────┐
//! │  ValveStore  │ ────────────▶ │ Session (one transaction)   │
//! │  SqlitePool  │               │ insert / list / find / save │
//! └──────────────┘               │ delete_by_name / commit     │
//!                                └─────────────────────────────┘
//! ```
//!
//! The store is shared by every request; sessions are not. A session that
//! is dropped without `commit` rolls back and returns its connection to the
//! pool.

mod errors;
mod session;
mod store;

pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use session::Session;
pub use store::{StoreOptions, ValveStore, SCHEMA_SQL};
