//! Workflows that span more than one collection.
//!
//! Each service owns the managers it needs and is built explicitly from a
//! `StorageConfig`. Business-rule failures come back as outcome enums;
//! only storage failures are errors.

pub mod inventory;
pub mod library;
pub mod school;

pub use inventory::{CreateOutcome, Inventory, ProductFilter, StockOutcome};
pub use library::{Library, LoanOutcome, LoanView, NewStudent, LOAN_PERIOD_DAYS};
pub use school::{EnrollmentOutcome, EnrollmentView, NewSchoolStudent, School};

use std::path::Path;

use crate::error::Result;
use crate::store::{Manager, Record, Repository};

/// Bootstrap `path` as an empty collection if needed and load it.
fn open_manager<E: Record>(path: &Path) -> Result<Manager<E>> {
    let repository = Repository::new(path);
    repository.ensure_exists()?;
    Manager::open(repository)
}
