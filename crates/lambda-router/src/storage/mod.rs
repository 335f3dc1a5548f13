//! Person storage.
//!
//! Route handlers talk to storage through the [`PersonStore`] trait. Two
//! implementations ship with the crate:
//!
//! - [`MemoryPersonStore`] - an in-process table, used locally and in tests
//! - [`ChaosPersonStore`] - wraps any store and injects latency or failures
//!   according to the chaos settings

mod chaos;
mod memory;

pub use chaos::ChaosPersonStore;
pub use memory::MemoryPersonStore;

use lambda_router_core::{utc_timestamp, RouterError};
use lambda_router_middleware::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Primary key (UUID v4).
    pub person_id: String,
    /// Owning client.
    pub client_id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Creation time, UTC `YYYY-MM-DD HH:MM:SS.mmm`.
    pub created_at: String,
}

impl Person {
    /// Creates a person with a fresh id, stamped now.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            person_id: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            name: name.into(),
            email: email.into(),
            created_at: utc_timestamp(),
        }
    }
}

/// One page of a table scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Returned items.
    #[serde(rename = "Items")]
    pub items: Vec<T>,
    /// Number of returned items.
    #[serde(rename = "Count")]
    pub count: usize,
}

impl<T> Page<T> {
    /// Wraps `items`, counting them.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

/// Storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The table cannot be reached.
    #[error("Table {table} unavailable: {message}")]
    Unavailable {
        /// Table name.
        table: String,
        /// Error message.
        message: String,
    },

    /// A failure injected by the chaos wrapper.
    #[error("Injected storage fault on table {table}")]
    InjectedFault {
        /// Table name.
        table: String,
    },
}

impl From<StorageError> for RouterError {
    fn from(err: StorageError) -> Self {
        Self::unclassified_with_source(format!("storage call failed: {err}"), err)
    }
}

/// Result type for storage calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value access to the person table.
pub trait PersonStore: Send + Sync + 'static {
    /// Returns the backing table name.
    fn table_name(&self) -> &str;

    /// Writes `person`, replacing any item with the same id.
    fn put<'a>(&'a self, person: &'a Person) -> BoxFuture<'a, StorageResult<()>>;

    /// Returns up to `limit` items in table order.
    fn find_first(&self, limit: usize) -> BoxFuture<'_, StorageResult<Page<Person>>>;
}
