//! Access to the key-value store.

mod client;
mod memory;
pub mod resp;

pub use self::client::{StoreClient, StoreConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use self::memory::MemoryStore;
use crate::Result;

/// The two operations we need from a key-value store.
pub trait Store {
    /// Set the value for the given key, overwriting the previous value if it existed.
    fn set(&mut self, key: String, value: String) -> Result<()>;
    /// Get the value for the given key, if it exists.
    fn get(&mut self, key: String) -> Result<Option<String>>;
}
