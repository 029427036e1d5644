//! Host adapters.

mod memory_host;

pub use memory_host::InMemoryHost;
