use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::Id;
use super::timestamp;
use crate::store::{DeleteMode, Record, Stocked};

pub type ProductId = Id<Product, String>;
pub type ProductChangeId = Id<ProductChange, u64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stock keeping unit, entered by the user.
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(rename = "inStock")]
    pub in_stock: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub description: String,
    pub active: bool,
}

impl Product {
    pub fn sku(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Product {
    type Id = ProductId;
    const COLLECTION: &'static str = "products";
    const FIELDS: &'static [&'static str] =
        &["id", "name", "category", "inStock", "price", "description", "active"];
    // Changes reference products by SKU, so deleted products stay on file.
    const DELETE_MODE: DeleteMode = DeleteMode::Deactivate;

    fn id(&self) -> ProductId {
        self.id.clone()
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Stocked for Product {
    fn quantity(&self) -> i64 {
        self.in_stock
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.in_stock = quantity;
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SKU: {} | {} - {} | category: {} | stock: {} | unit price: {} | active: {}",
            self.id,
            self.name,
            self.description,
            self.category,
            self.in_stock,
            self.price,
            self.in_stock >= 0 && self.active
        )
    }
}

// ============================================================================
// Change history
// ============================================================================

/// Kinds of change written by the inventory workflows. Stored as free text,
/// so records written by other tools may carry other values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    ProductCreated,
    StockReduced,
    StockIncreased,
    ProductDeleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::ProductCreated => "PRODUCT_CREATED",
            ChangeKind::StockReduced => "STOCK_REDUCED",
            ChangeKind::StockIncreased => "STOCK_INCREASED",
            ChangeKind::ProductDeleted => "PRODUCT_DELETED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit entry for a product. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductChange {
    pub id: ProductChangeId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    /// Amount moved by the change (initial stock for creations).
    pub stock: i64,
    pub reason: String,
    pub user: String,
    pub product_id: ProductId,
}

impl Record for ProductChange {
    type Id = ProductChangeId;
    const COLLECTION: &'static str = "product_changes";
    const FIELDS: &'static [&'static str] =
        &["id", "type", "date", "stock", "reason", "user", "product_id"];

    fn id(&self) -> ProductChangeId {
        self.id
    }
}

impl fmt::Display for ProductChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} SKU: {} | {} | {} | stock: {} | by {} | reason: {}",
            self.id,
            self.product_id,
            self.kind,
            self.date.format("%Y-%m-%d %H:%M:%S"),
            self.stock,
            self.user,
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::store::{from_record, to_record};
    use chrono::TimeZone;
    use serde_json::json;
    use std::str::FromStr;

    fn sample_product() -> Product {
        Product {
            id: ProductId::from("SKU-ABC-001"),
            name: "Widget".to_string(),
            category: "Gadgets".to_string(),
            in_stock: 100,
            price: Decimal::from_str("19.99").unwrap(),
            description: "A very useful widget.".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_product_record_shape() {
        let record = to_record(&sample_product()).unwrap();
        assert_eq!(
            serde_json::Value::Object(record),
            json!({
                "id": "SKU-ABC-001",
                "name": "Widget",
                "category": "Gadgets",
                "inStock": 100,
                "price": "19.99",
                "description": "A very useful widget.",
                "active": true
            })
        );
    }

    #[test]
    fn test_product_round_trip_keeps_exact_price() {
        let mut product = sample_product();
        product.price = Decimal::from_str("0.1000000000000000000001").unwrap();
        let back: Product = from_record(to_record(&product).unwrap()).unwrap();
        assert_eq!(back, product);
        assert_eq!(back.price.to_string(), "0.1000000000000000000001");
    }

    #[test]
    fn test_product_price_must_be_a_decimal() {
        let mut record = to_record(&sample_product()).unwrap();
        record.insert("price".to_string(), json!("nineteen"));
        assert!(matches!(
            from_record::<Product>(record),
            Err(RecordError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_product_missing_renamed_field() {
        let mut record = to_record(&sample_product()).unwrap();
        record.remove("inStock");
        assert_eq!(
            from_record::<Product>(record).unwrap_err(),
            RecordError::MissingField("inStock")
        );
    }

    #[test]
    fn test_deactivate_clears_active() {
        let mut product = sample_product();
        product.deactivate();
        assert!(!product.active);
        assert!(product.to_string().contains("active: false"));
    }

    #[test]
    fn test_change_round_trip() {
        let change = ProductChange {
            id: ProductChangeId::new(3),
            kind: ChangeKind::StockReduced.as_str().to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            stock: 4,
            reason: "Sold".to_string(),
            user: "ana".to_string(),
            product_id: ProductId::from("SKU-1"),
        };
        let record = to_record(&change).unwrap();
        assert_eq!(record.get("type"), Some(&json!("STOCK_REDUCED")));
        assert_eq!(record.get("date"), Some(&json!("2024-05-01T09:30:00+00:00")));

        let back: ProductChange = from_record(record).unwrap();
        assert_eq!(back, change);
    }

    #[test]
    fn test_change_reads_naive_legacy_dates() {
        let record = json!({
            "id": 1,
            "type": "Producto Creado",
            "date": "2025-09-20T18:04:11.512346",
            "stock": 10,
            "reason": "Agregado nuevo producto.",
            "user": "admin",
            "product_id": "SKU-1"
        });
        let serde_json::Value::Object(record) = record else {
            panic!("not an object");
        };
        let change: ProductChange = from_record(record).unwrap();
        assert_eq!(change.kind, "Producto Creado");
        assert_eq!(change.date.timestamp_subsec_micros(), 512_346);
    }
}
