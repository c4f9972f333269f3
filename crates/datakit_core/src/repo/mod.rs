//! Repository contract and id-owning backends.
//!
//! # Responsibility
//! - Define the `Repository<T>` CRUD contract.
//! - Provide in-memory and JSON-file implementations that callers can swap
//!   without code changes.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   I/O and encoding errors.
//! - Mutations are serialized by a per-instance lock.

pub mod file_repo;
pub mod kv_store;
pub mod memory_repo;
pub mod repository;

pub use file_repo::FileRepository;
pub use kv_store::MemoryKv;
pub use memory_repo::MemoryRepository;
pub use repository::{EntityId, RepoError, RepoResult, Repository};
