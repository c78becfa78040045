use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a phone number for display.
/// Eight digits become XXXX-XXXX, ten become (XXX) XXX-XXXX.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        8 => format!("{}-{}", &digits[0..4], &digits[4..8]),
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        _ => phone.to_string(),
    }
}

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Price with two decimals, rounded half away from zero.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y %H:%M").to_string()
}
