//! Entity types for the three applications.
//!
//! - `inventory`: `Product` and its `ProductChange` audit trail
//! - `library`: `Book`, `Student` and `Loan`
//! - `school`: `Student`, `Course` and `Enrollment`
//!
//! Ids are branded with their entity type (see `id`).

pub mod id;
pub mod inventory;
pub mod library;
pub mod school;
pub mod timestamp;

pub use id::{Id, IdPrefix, NextId};
