//! The `kvmap` crate loads a static `source target` mapping file into a
//! key-value store under a namespace prefix, and answers lookups of those
//! sources read line by line from an input stream.
//!
//! The store is reached over the Redis serialization protocol; see
//! [`StoreClient`]. Anything implementing [`Store`] can stand in for it.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::module_name_repetitions, missing_docs)]

#[macro_use]
extern crate slog;

mod errors;
mod import;
mod lookup;
mod mapping;
pub mod store;

pub use self::errors::{is_recoverable, MapError, Result};
pub use self::import::{read_mapping_file, ImportReport, Importer, MalformedPolicy};
pub use self::lookup::{Lookup, LookupReport, LookupState, DEFAULT_MISS_MARKER};
pub use self::mapping::{is_ignored, parse_line, MappingEntry, Namespace, DEFAULT_NAMESPACE};
pub use self::store::{MemoryStore, Store, StoreClient, StoreConfig};
