// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mass units and comma-decimal formatting.
//!
//! Masses are stored as whole grams. They are shown to the user as kilograms
//! with one fractional digit and a comma decimal separator (`72,5`).

use crate::error::AppError;

const GRAMS_PER_KG: u32 = 1000;
const MAX_FRACTION_DIGITS: usize = 3;

/// Convert grams to kilograms.
pub fn grams_to_kg(grams: f64) -> f64 {
    grams / f64::from(GRAMS_PER_KG)
}

/// Display form of a stored mass: kilograms, one decimal, comma separator.
pub fn format_kg(grams: u32) -> String {
    let tenths = (u64::from(grams) + 50) / 100;
    format!("{},{}", tenths / 10, tenths % 10)
}

/// Display form of a fractional mass in grams (e.g. an average).
pub fn format_kg_f64(grams: f64) -> String {
    format_decimal(grams_to_kg(grams), 1)
}

/// Lossless kilogram form for reports: `72450` → `72,45`, `72000` → `72`.
pub fn format_kg_exact(grams: u32) -> String {
    let whole = grams / GRAMS_PER_KG;
    let fraction = grams % GRAMS_PER_KG;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:03}", fraction);
    format!("{},{}", whole, digits.trim_end_matches('0'))
}

/// Format `value` with `digits` fractional digits and a comma separator.
pub fn format_decimal(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, value).replace('.', ",")
}

/// Format with an explicit sign: `+1,5`, `-0,3`, `0,0`.
pub fn format_signed(value: f64, digits: usize) -> String {
    let formatted = format_decimal(value.abs(), digits);
    let is_zero = formatted.chars().all(|c| c == '0' || c == ',');
    if is_zero {
        formatted
    } else if value > 0.0 {
        format!("+{}", formatted)
    } else {
        format!("-{}", formatted)
    }
}

/// Parse user-entered kilograms (`72,5` or `72.5`) into whole grams.
///
/// At most three fractional digits are accepted so the result is exact.
pub fn parse_kg(raw: &str) -> Result<u32, AppError> {
    let invalid = || AppError::BadRequest(format!("Invalid decimal '{}'", raw));

    let text = raw.trim();
    let (whole, fraction) = match text.split_once([',', '.']) {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    if whole.is_empty()
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
        || fraction.len() > MAX_FRACTION_DIGITS
    {
        return Err(invalid());
    }

    let whole: u32 = whole.parse().map_err(|_| invalid())?;
    let fraction: u32 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = MAX_FRACTION_DIGITS);
        padded.parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(GRAMS_PER_KG)
        .and_then(|grams| grams.checked_add(fraction))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kg_rounds_to_one_decimal() {
        assert_eq!(format_kg(72_450), "72,5");
        assert_eq!(format_kg(72_449), "72,4");
        assert_eq!(format_kg(65_000), "65,0");
        assert_eq!(format_kg(0), "0,0");
        assert_eq!(format_kg(u32::MAX), "4294967,3");
    }

    #[test]
    fn test_format_kg_exact_trims_zeros() {
        assert_eq!(format_kg_exact(72_450), "72,45");
        assert_eq!(format_kg_exact(72_000), "72");
        assert_eq!(format_kg_exact(72_005), "72,005");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(1.538, 1), "+1,5");
        assert_eq!(format_signed(-0.26, 1), "-0,3");
        assert_eq!(format_signed(0.01, 1), "0,0");
    }

    #[test]
    fn test_parse_kg_accepts_both_separators() {
        assert_eq!(parse_kg("72,5").unwrap(), 72_500);
        assert_eq!(parse_kg("72.5").unwrap(), 72_500);
        assert_eq!(parse_kg(" 80 ").unwrap(), 80_000);
        assert_eq!(parse_kg("65,125").unwrap(), 65_125);
    }

    #[test]
    fn test_parse_kg_rejects_malformed_text() {
        for raw in ["", "abc", "-3", "72,5,1", "72,1234", ",5", "1e3"] {
            assert!(
                matches!(parse_kg(raw), Err(AppError::BadRequest(_))),
                "expected rejection for {:?}",
                raw
            );
        }
    }
}
