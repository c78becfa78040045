//! Core library for the stockroom record-keeping apps.
//!
//! Every collection lives in one JSON file. A `Repository` reads or rewrites
//! the whole file on each call, and a `Manager` keeps an in-memory copy that
//! is reloaded after every write. The `services` module builds the
//! inventory, library and school workflows on top of those managers.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use config::{App, Collection, StorageConfig};
pub use error::{RecordError, Result, StoreError};
pub use services::{Inventory, Library, School};
pub use store::{Deletion, Manager, Record, Repository};
