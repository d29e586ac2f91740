//! Local data sources: in-memory repositories, mock fixtures and the
//! persistent key/value store

pub mod fixtures;
pub mod in_memory;
pub mod local_cache;

pub use in_memory::InMemoryRepository;
pub use local_cache::LocalStore;
