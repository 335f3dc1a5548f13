//! In-memory person table.

use super::{Page, Person, PersonStore, StorageResult};
use lambda_router_middleware::BoxFuture;
use parking_lot::RwLock;

/// A person table held in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPersonStore {
    table_name: String,
    items: RwLock<Vec<Person>>,
}

impl MemoryPersonStore {
    /// Creates an empty table.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            items: RwLock::new(Vec::new()),
        }
    }

    /// Returns the number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Looks up a person by id.
    #[must_use]
    pub fn get(&self, person_id: &str) -> Option<Person> {
        self.items
            .read()
            .iter()
            .find(|p| p.person_id == person_id)
            .cloned()
    }
}

impl PersonStore for MemoryPersonStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn put<'a>(&'a self, person: &'a Person) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let mut items = self.items.write();
            match items.iter_mut().find(|p| p.person_id == person.person_id) {
                Some(existing) => *existing = person.clone(),
                None => items.push(person.clone()),
            }
            Ok(())
        })
    }

    fn find_first(&self, limit: usize) -> BoxFuture<'_, StorageResult<Page<Person>>> {
        Box::pin(async move {
            let items = self.items.read().iter().take(limit).cloned().collect();
            Ok(Page::new(items))
        })
    }
}
