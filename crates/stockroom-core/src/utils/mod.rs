//! Display helpers shared by the front ends.

pub mod format;

pub use format::{format_date, format_phone, format_price, truncate_string};
