use sqlx::{PgPool, migrate::Migrator};

use crate::memory::MemoryStore;

/// Compile-time discovered SQLx migrations for the `roster-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Where player records actually live.
#[derive(Clone, Debug)]
pub enum Backend {
    Postgres(PgPool),
    Memory(MemoryStore),
}

/// Shared database handle passed across crates.
#[derive(Clone, Debug)]
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres(pool),
        }
    }

    /// Create a database handle backed by an empty in-process store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::default()),
        }
    }

    /// Expose the active backend for query modules.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Expose the underlying pool when running against PostgreSQL.
    pub fn pool(&self) -> Option<&PgPool> {
        match &self.backend {
            Backend::Postgres(pool) => Some(pool),
            Backend::Memory(_) => None,
        }
    }
}
