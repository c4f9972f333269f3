//! Storage abstraction layer with interchangeable backends.
//!
//! One CRUD contract (`Repository`) over in-memory and JSON-file stores, a
//! generic relational engine driven by the `Model` mapping trait, and a
//! generic document engine over a `Collection` handle. Bulk reads return
//! `Array<T>`.

pub mod collection;
pub mod config;
pub mod db;
pub mod document;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sql;

pub use collection::{Array, IndexOutOfRange, Queue};
pub use config::{ConfigError, DocumentConfig, FileRepoConfig, SqlConfig, StoreConfig};
pub use document::{
    Collection, DocError, DocResult, DocumentId, DocumentStore, Filter, FindOptions,
    MemoryCollection, SortOrder, UpdateOutcome,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{scan_column, MappingError, MappingResult, Model, Params};
pub use repo::{
    EntityId, FileRepository, MemoryKv, MemoryRepository, RepoError, RepoResult, Repository,
};
pub use sql::{SqlError, SqlResult, SqlTable};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
