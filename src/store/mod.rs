//! Persistence layer: the flag store and profile store contracts plus
//! their libSQL-backed and in-memory implementations.

pub mod keys;
pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use memory::{MemoryFlagStore, MemoryProfileStore};
pub use traits::{FlagStore, ProfileStore};
