use std::io::{BufRead, Write};

use anyhow::Result;
use rust_decimal::Decimal;
use stockroom_core::models::inventory::{Product, ProductChange, ProductId};
use stockroom_core::services::{CreateOutcome, Inventory, ProductFilter, StockOutcome};
use stockroom_core::store::{Deletion, RangeFilter};
use stockroom_core::utils::{format_date, format_price, truncate_string};

use super::{invalid_option, print_all, select};
use crate::prompt::Prompt;

const OPTIONS: &[&str] = &[
    "Create product",
    "Show products",
    "Filter products",
    "Reduce product stock",
    "Add product stock",
    "Delete product",
    "Show change history",
    "Show change history by product",
    "Show change history by user",
    "Quit",
];

/// Description column width in product tables.
const DESCRIPTION_WIDTH: usize = 30;

pub fn run<R: BufRead, W: Write>(
    mut inventory: Inventory,
    user: &str,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    loop {
        match select(prompt, "Inventory", OPTIONS)? {
            1 => create_product(&mut inventory, user, prompt)?,
            2 => {
                let products = inventory.products().to_vec();
                print_products(prompt.out(), &products, "No products registered.")?;
            }
            3 => filter_products(&inventory, prompt)?,
            4 => move_stock(&mut inventory, user, prompt, false)?,
            5 => move_stock(&mut inventory, user, prompt, true)?,
            6 => delete_product(&mut inventory, user, prompt)?,
            7 => print_changes(prompt.out(), inventory.changes(), "No changes recorded.")?,
            8 => {
                let sku = ProductId::from(prompt.text("Product SKU:")?);
                let changes = inventory.changes_for_product(&sku);
                print_changes(prompt.out(), &changes, "No changes recorded for that product.")?;
            }
            9 => {
                let who = prompt.text("User:")?;
                let changes = inventory.changes_by_user(&who);
                print_changes(prompt.out(), &changes, "No changes recorded for that user.")?;
            }
            10 => return Ok(()),
            _ => invalid_option(prompt.out())?,
        }
    }
}

fn create_product<R: BufRead, W: Write>(
    inventory: &mut Inventory,
    user: &str,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let id = ProductId::from(prompt.text("SKU:")?);
    let name = prompt.text("Name:")?;
    let category = prompt.text("Category:")?;
    let in_stock: u32 = prompt.number("Initial stock:")?;
    let price = loop {
        let price: Decimal = prompt.number("Unit price:")?;
        if price >= Decimal::ZERO {
            break price;
        }
        writeln!(prompt.out(), "The price cannot be negative.")?;
    };
    let description = prompt.text("Description:")?;

    let product = Product {
        id,
        name,
        category,
        in_stock: i64::from(in_stock),
        price,
        description,
        active: true,
    };
    match inventory.create_product(product, user)? {
        CreateOutcome::Created => writeln!(prompt.out(), "Product created.")?,
        CreateOutcome::DuplicateSku => writeln!(prompt.out(), "A product with that SKU already exists.")?,
    }
    Ok(())
}

fn filter_products<R: BufRead, W: Write>(inventory: &Inventory, prompt: &mut Prompt<R, W>) -> Result<()> {
    writeln!(prompt.out(), "Leave any field blank to skip it.")?;
    let filter = ProductFilter {
        category: prompt.optional_text("Category:")?,
        name: prompt.optional_text("Name:")?,
        description: prompt.optional_text("Description:")?,
        active: prompt.optional_flag("Active only?")?,
        price: RangeFilter::new(
            prompt.optional_number("Minimum price:")?,
            prompt.optional_number("Maximum price:")?,
        ),
        stock: RangeFilter::new(
            prompt.optional_number("Minimum stock:")?,
            prompt.optional_number("Maximum stock:")?,
        ),
        sku: prompt.optional_text("Exact SKU:")?.map(ProductId::from),
        sku_contains: prompt.optional_text("SKU contains:")?,
        partial_match: prompt.optional_flag("Partial text match?")?.unwrap_or(true),
        case_insensitive: prompt.optional_flag("Ignore case?")?.unwrap_or(true),
    };

    let products = inventory.filter_products(&filter);
    print_products(prompt.out(), &products, "No products match the filter.")
}

fn move_stock<R: BufRead, W: Write>(
    inventory: &mut Inventory,
    user: &str,
    prompt: &mut Prompt<R, W>,
    increase: bool,
) -> Result<()> {
    let sku = ProductId::from(prompt.text("Product SKU:")?);
    let reason = prompt.text("Reason:")?;
    let amount: u32 = prompt.number("Amount:")?;

    let outcome = if increase {
        inventory.add_stock(&sku, amount, &reason, user)?
    } else {
        inventory.reduce_stock(&sku, amount, &reason, user)?
    };

    let out = prompt.out();
    match outcome {
        StockOutcome::Updated { quantity, low_stock } => {
            writeln!(out, "Product updated. Current stock: {}", quantity)?;
            if low_stock {
                writeln!(out, "Warning: product {} is running out of stock ({} left).", sku, quantity)?;
            }
        }
        StockOutcome::Insufficient { available } => {
            writeln!(out, "Not enough stock: {} available, {} requested.", available, amount)?;
        }
        StockOutcome::ZeroAmount => writeln!(out, "The amount must be greater than zero.")?,
        StockOutcome::NotFound => writeln!(out, "The product does not exist.")?,
    }
    Ok(())
}

fn delete_product<R: BufRead, W: Write>(
    inventory: &mut Inventory,
    user: &str,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let sku = ProductId::from(prompt.text("Product SKU:")?);
    let reason = prompt.text("Reason:")?;

    let mut prompt_error = None;
    let outcome = inventory.delete_product(&sku, &reason, user, |product| {
        match prompt.confirm(&format!("Delete product {} ({})?", product.id, product.name)) {
            Ok(answer) => answer,
            Err(e) => {
                prompt_error = Some(e);
                false
            }
        }
    })?;
    if let Some(e) = prompt_error {
        return Err(e);
    }

    let out = prompt.out();
    match outcome {
        Deletion::Deleted => writeln!(out, "Product deleted.")?,
        Deletion::Cancelled => writeln!(out, "Deletion cancelled.")?,
        Deletion::NotFound => writeln!(out, "The product does not exist.")?,
    }
    Ok(())
}

fn print_products<W: Write>(out: &mut W, products: &[Product], empty: &str) -> Result<()> {
    if products.is_empty() {
        writeln!(out, "{}", empty)?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<12} {:<20} {:<12} {:>6} {:>10}  {:<width$} {}",
        "SKU",
        "Name",
        "Category",
        "Stock",
        "Price",
        "Description",
        "Active",
        width = DESCRIPTION_WIDTH
    )?;
    for p in products {
        writeln!(
            out,
            "{:<12} {:<20} {:<12} {:>6} {:>10}  {:<width$} {}",
            p.sku(),
            truncate_string(&p.name, 20),
            truncate_string(&p.category, 12),
            p.in_stock,
            format_price(p.price),
            truncate_string(&p.description, DESCRIPTION_WIDTH),
            if p.active { "yes" } else { "no" },
            width = DESCRIPTION_WIDTH
        )?;
    }
    Ok(())
}

fn print_changes<W: Write>(out: &mut W, changes: &[ProductChange], empty: &str) -> Result<()> {
    print_all(out, changes, empty)?;
    if let (Some(first), Some(last)) = (changes.first(), changes.last()) {
        writeln!(
            out,
            "{} change(s) from {} to {}",
            changes.len(),
            format_date(&first.date),
            format_date(&last.date)
        )?;
    }
    Ok(())
}
