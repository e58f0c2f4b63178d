//! quizkit-store: data store backends.
//!
//! Implements the `DataStore` trait for a directory of JSON files and for an
//! in-memory map, and loads the `quizkit.toml` configuration that selects
//! between them.

pub mod config;
pub mod file;
pub mod memory;

pub use config::{
    create_store, load_config, load_config_from, open_provider, QuizkitConfig, StoreKind,
    DATA_DIR_ENV,
};
pub use file::FileStore;
pub use memory::MemoryStore;
