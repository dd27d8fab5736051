//! Object-storage backends for published proposal documents.
//!
//! [`ObjectStore`] is the seam the publisher writes through: one `put` of
//! a finished byte stream under a flat key. [`GcsClient`] implements it
//! against the Google Cloud Storage JSON upload API; [`MemoryObjectStore`]
//! is the in-process double used by tests to observe overwrite semantics
//! and injected failures.

mod gcs;
mod store;

pub use gcs::GcsClient;
pub use store::{MemoryObjectStore, ObjectStore, StorageError, StoredObject};
