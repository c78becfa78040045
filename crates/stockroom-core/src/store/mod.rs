//! Generic JSON-file storage.
//!
//! This module provides the pieces every entity family shares:
//!
//! - `Record`: how an entity maps to one flat JSON object
//! - `Repository`: one collection per file, every call reads or rewrites it
//! - `Manager`: an in-memory cache over a repository, reloaded after each write
//! - `filter`: optional text/range/flag predicates for cache queries

pub mod filter;
pub mod manager;
pub mod record;
pub mod repository;

pub use filter::{RangeFilter, TextMatch};
pub use manager::{Adjustment, Deletion, Manager, Stocked, LOW_STOCK_THRESHOLD};
pub use record::{from_record, to_record, DeleteMode, Record, RecordMap};
pub use repository::Repository;
