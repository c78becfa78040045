use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::open_manager;
use crate::config::{Collection, StorageConfig};
use crate::error::Result;
use crate::models::inventory::{ChangeKind, Product, ProductChange, ProductId};
use crate::store::filter::flag_matches;
use crate::store::{Adjustment, Deletion, Manager, RangeFilter, TextMatch};

/// Result of `Inventory::create_product`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A product with this SKU is already on file, active or not.
    DuplicateSku,
}

/// Result of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutcome {
    Updated { quantity: i64, low_stock: bool },
    /// The reduction exceeds what is on hand; nothing changed.
    Insufficient { available: i64 },
    /// An amount of zero moves nothing and is not recorded.
    ZeroAmount,
    /// No active product with that SKU.
    NotFound,
}

/// Product query. Unset fields match everything; set fields must all match.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub price: RangeFilter<Decimal>,
    pub stock: RangeFilter<i64>,
    pub sku: Option<ProductId>,
    pub sku_contains: Option<String>,
    /// Substring match for text fields when true, whole value otherwise.
    pub partial_match: bool,
    pub case_insensitive: bool,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            name: None,
            description: None,
            active: None,
            price: RangeFilter::default(),
            stock: RangeFilter::default(),
            sku: None,
            sku_contains: None,
            partial_match: true,
            case_insensitive: true,
        }
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let text = |query: &Option<String>, value: &str| {
            query.as_ref().map_or(true, |q| {
                TextMatch::new(q.as_str(), self.partial_match, self.case_insensitive).matches(value)
            })
        };

        self.sku.as_ref().map_or(true, |sku| *sku == product.id)
            && text(&self.sku_contains, product.sku())
            && text(&self.category, &product.category)
            && text(&self.name, &product.name)
            && text(&self.description, &product.description)
            && flag_matches(self.active, product.active)
            && self.price.contains(&product.price)
            && self.stock.contains(&product.in_stock)
    }
}

/// Products and their change history.
pub struct Inventory {
    products: Manager<Product>,
    changes: Manager<ProductChange>,
}

impl Inventory {
    pub fn open(config: &StorageConfig) -> Result<Self> {
        Ok(Self {
            products: open_manager(&config.path_for(Collection::Products))?,
            changes: open_manager(&config.path_for(Collection::ProductChanges))?,
        })
    }

    /// Every stored product, inactive ones included.
    pub fn products(&self) -> &[Product] {
        self.products.items()
    }

    /// Active product by SKU.
    pub fn product(&self, sku: &ProductId) -> Result<Option<Product>> {
        Ok(self.products.get(sku)?.filter(|product| product.active))
    }

    pub fn create_product(&mut self, product: Product, user: &str) -> Result<CreateOutcome> {
        if self.products.get(&product.id)?.is_some() {
            return Ok(CreateOutcome::DuplicateSku);
        }

        let sku = product.id.clone();
        let stock = product.in_stock;
        self.products.create(product)?;
        self.record_change(ChangeKind::ProductCreated, stock, "New product added", user, &sku)?;
        info!(sku = %sku, user, "Product created");
        Ok(CreateOutcome::Created)
    }

    pub fn reduce_stock(
        &mut self,
        sku: &ProductId,
        amount: u32,
        reason: &str,
        user: &str,
    ) -> Result<StockOutcome> {
        self.move_stock(sku, -i64::from(amount), ChangeKind::StockReduced, reason, user)
    }

    pub fn add_stock(
        &mut self,
        sku: &ProductId,
        amount: u32,
        reason: &str,
        user: &str,
    ) -> Result<StockOutcome> {
        self.move_stock(sku, i64::from(amount), ChangeKind::StockIncreased, reason, user)
    }

    fn move_stock(
        &mut self,
        sku: &ProductId,
        delta: i64,
        kind: ChangeKind,
        reason: &str,
        user: &str,
    ) -> Result<StockOutcome> {
        if delta == 0 {
            return Ok(StockOutcome::ZeroAmount);
        }
        if self.product(sku)?.is_none() {
            return Ok(StockOutcome::NotFound);
        }

        let outcome = match self.products.adjust_quantity(sku, delta)? {
            Adjustment::NotFound => return Ok(StockOutcome::NotFound),
            Adjustment::Insufficient { available, .. } => {
                return Ok(StockOutcome::Insufficient { available })
            }
            Adjustment::Applied { quantity, low_stock } => StockOutcome::Updated { quantity, low_stock },
        };

        self.record_change(kind, delta.abs(), reason, user, sku)?;
        info!(sku = %sku, user, delta, kind = %kind, "Stock updated");
        Ok(outcome)
    }

    /// Soft-delete after `confirm` agrees, recording who did it and why.
    pub fn delete_product(
        &mut self,
        sku: &ProductId,
        reason: &str,
        user: &str,
        confirm: impl FnOnce(&Product) -> bool,
    ) -> Result<Deletion> {
        if self.product(sku)?.is_none() {
            return Ok(Deletion::NotFound);
        }

        let outcome = self.products.delete(sku, confirm)?;
        if outcome == Deletion::Deleted {
            self.record_change(ChangeKind::ProductDeleted, 0, reason, user, sku)?;
            info!(sku = %sku, user, "Product deleted");
        }
        Ok(outcome)
    }

    pub fn filter_products(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products.filter(|product| filter.matches(product))
    }

    pub fn changes(&self) -> &[ProductChange] {
        self.changes.items()
    }

    pub fn changes_for_product(&self, sku: &ProductId) -> Vec<ProductChange> {
        self.changes.filter(|change| change.product_id == *sku)
    }

    pub fn changes_by_user(&self, user: &str) -> Vec<ProductChange> {
        self.changes.filter(|change| change.user == user)
    }

    fn record_change(
        &mut self,
        kind: ChangeKind,
        stock: i64,
        reason: &str,
        user: &str,
        sku: &ProductId,
    ) -> Result<()> {
        let change = ProductChange {
            id: self.changes.next_id()?,
            kind: kind.as_str().to_string(),
            date: Utc::now(),
            stock,
            reason: reason.to_string(),
            user: user.to_string(),
            product_id: sku.clone(),
        };
        if let Err(e) = self.changes.create(change) {
            warn!(sku = %sku, kind = %kind, "Product updated but change history write failed");
            return Err(e);
        }
        Ok(())
    }
}
