//! Storage access for events, organizations and tags.
//!
//! Every repository is an async trait with a PostgreSQL implementation and
//! an in-memory one used by tests and by `STORAGE_BACKEND=memory`.

use std::collections::BTreeMap;

pub mod event;
pub mod organization;
pub mod tag;

pub use event::{DateRange, EventRepository, EventSearch, InMemoryEventRepository, PgEventRepository};
pub use organization::{
    InMemoryOrganizationRepository, OrganizationRepository, PgOrganizationRepository,
};
pub use tag::{InMemoryTagRepository, PgTagRepository, TagRepository};

pub type RepositoryResult<T> = Result<T, sqlx::Error>;

/// Rows keyed by a server-assigned id, mimicking a `BIGSERIAL` table.
#[derive(Debug)]
pub(crate) struct MemoryTable<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> MemoryTable<T> {
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub(crate) fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub(crate) fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }
}
