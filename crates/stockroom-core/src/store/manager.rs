use tracing::{debug, warn};

use super::record::Record;
use super::repository::Repository;
use crate::error::Result;
use crate::models::NextId;

/// Remaining quantity at or below which a decrease raises the low-stock flag.
pub const LOW_STOCK_THRESHOLD: i64 = 1;

/// Entities carrying an on-hand quantity.
pub trait Stocked {
    fn quantity(&self) -> i64;
    fn set_quantity(&mut self, quantity: i64);
}

/// Result of `Manager::adjust_quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Applied { quantity: i64, low_stock: bool },
    /// The decrease would go below zero; nothing was written.
    Insufficient { available: i64, requested: i64 },
    NotFound,
}

/// Result of a confirmed delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The confirmation hook declined.
    Cancelled,
    NotFound,
}

/// In-memory cache over one repository.
///
/// The cache is loaded on `open` and reloaded from disk after every write,
/// so after a successful mutating call it always matches the file. If a
/// write fails the error is returned and the cache keeps whatever was
/// attempted until the next `reload`.
pub struct Manager<E: Record> {
    repository: Repository<E>,
    items: Vec<E>,
}

impl<E: Record> Manager<E> {
    pub fn open(repository: Repository<E>) -> Result<Self> {
        let items = repository.get_all()?;
        debug!(collection = E::COLLECTION, count = items.len(), "Manager loaded");
        Ok(Self { repository, items })
    }

    pub fn repository(&self) -> &Repository<E> {
        &self.repository
    }

    /// Cached entities, in file order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn reload(&mut self) -> Result<()> {
        self.items = self.repository.get_all()?;
        Ok(())
    }

    /// Look up by id. Reads the file, not the cache.
    pub fn get(&self, id: &E::Id) -> Result<Option<E>> {
        self.repository.get_by_id(id)
    }

    pub fn create(&mut self, entity: E) -> Result<()> {
        self.items.push(entity);
        self.persist()
    }

    /// Persist changes to an existing entity. Fails with `NotFound` on a miss.
    pub fn update(&mut self, entity: &E) -> Result<()> {
        self.repository.update(entity)?;
        self.reload()
    }

    /// Delete after asking `confirm`. The mode (remove vs. deactivate)
    /// follows `E::DELETE_MODE`.
    pub fn delete(&mut self, id: &E::Id, confirm: impl FnOnce(&E) -> bool) -> Result<Deletion> {
        let Some(entity) = self.get(id)? else {
            return Ok(Deletion::NotFound);
        };
        if !confirm(&entity) {
            return Ok(Deletion::Cancelled);
        }
        let deleted = self.repository.delete(id)?;
        self.reload()?;
        Ok(if deleted { Deletion::Deleted } else { Deletion::NotFound })
    }

    pub fn filter(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.items.iter().filter(|entity| predicate(entity)).cloned().collect()
    }

    fn persist(&mut self) -> Result<()> {
        self.repository.save_all(&self.items)?;
        self.reload()
    }
}

impl<E: Record> Manager<E>
where
    E::Id: NextId,
{
    /// Next id after the last stored record, or the first id when empty.
    pub fn next_id(&self) -> Result<E::Id> {
        let stored = self.repository.get_all()?;
        match stored.last() {
            None => Ok(<E::Id as NextId>::first()),
            Some(last) => last
                .id()
                .successor()
                .map_err(|source| self.repository.record_error(stored.len() - 1, source)),
        }
    }
}

impl<E: Record + Stocked> Manager<E> {
    /// Add `delta` (negative to remove) to the stored quantity.
    pub fn adjust_quantity(&mut self, id: &E::Id, delta: i64) -> Result<Adjustment> {
        let Some(mut entity) = self.get(id)? else {
            return Ok(Adjustment::NotFound);
        };

        let available = entity.quantity();
        let quantity = available.saturating_add(delta);
        // Increases always apply, even onto a negative balance
        if delta < 0 && quantity < 0 {
            return Ok(Adjustment::Insufficient {
                available,
                requested: delta.saturating_neg(),
            });
        }

        entity.set_quantity(quantity);
        self.update(&entity)?;

        let low_stock = delta < 0 && quantity <= LOW_STOCK_THRESHOLD;
        if low_stock {
            warn!(collection = E::COLLECTION, id = %id, quantity, "Low stock");
        }
        Ok(Adjustment::Applied { quantity, low_stock })
    }
}

// ============================================================================
// Tests
// ============================================================================
