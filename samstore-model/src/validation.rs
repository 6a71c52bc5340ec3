//! Field-level checks shared by every `New*` / `*Update` input.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{ModelError, Result};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Maximum number of fractional digits stored for prices.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Maximum number of digits stored for prices, fractional ones included.
pub const PRICE_MAX_DIGITS: u32 = 28;

pub fn required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModelError::MissingField(field));
    }
    Ok(())
}

pub fn max_chars(field: &'static str, value: &str, max: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ModelError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Non-blank, bounded text.
pub fn text(field: &'static str, value: &str, max: usize) -> Result<()> {
    required(field, value)?;
    max_chars(field, value, max)
}

pub fn slug(field: &'static str, value: &str, max: usize) -> Result<()> {
    text(field, value, max)?;
    if !SLUG_PATTERN.is_match(value) {
        return Err(ModelError::InvalidSlug {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn order(field: &'static str, value: i32) -> Result<()> {
    if value < 1 {
        return Err(ModelError::OutOfRange {
            field,
            reason: format!("order must be a positive integer, got {value}"),
        });
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(ModelError::OutOfRange {
            field,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}

pub fn price(field: &'static str, value: &Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ModelError::OutOfRange {
            field,
            reason: format!("price must not be negative, got {value}"),
        });
    }
    if value.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(ModelError::OutOfRange {
            field,
            reason: format!(
                "ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places"
            ),
        });
    }
    let whole_digits = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES;
    let limit = Decimal::from_i128_with_scale(10_i128.pow(whole_digits), 0);
    if value.abs().trunc() >= limit {
        return Err(ModelError::OutOfRange {
            field,
            reason: format!(
                "ensure that there are no more than {whole_digits} digits before the decimal point"
            ),
        });
    }
    Ok(())
}

/// A validated price as the `NUMERIC(28, 2)` column holds it: always two
/// fractional digits.
pub fn stored_price(value: Decimal) -> Decimal {
    let mut stored = value;
    stored.rescale(PRICE_DECIMAL_PLACES);
    stored
}
