//! In-process containers shared by every backend.
//!
//! # Responsibility
//! - Provide `Array<T>`, the uniform result-set type for bulk reads.
//! - Provide `Queue<T>` for FIFO hand-off built on the same storage.

pub mod array;
pub mod queue;

pub use array::{Array, IndexOutOfRange};
pub use queue::Queue;
