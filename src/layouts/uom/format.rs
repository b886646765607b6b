// src/layouts/uom/format.rs

use super::table::{convert_value, normalize_uom};
use super::UnitSystem;

/// Precision for converted values when no custom precision is set.
pub const DEFAULT_DECIMALS: u32 = 4;

/// Parse a plain decimal number: optional sign, optional thousands
/// separators in groups of three, optional fraction. Anything else
/// (exponents, units, words) is not numeric.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    if int_part.is_empty() && frac_part.is_none() {
        return None;
    }
    if !int_part.is_empty() && !valid_integer_part(int_part) {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn valid_integer_part(part: &str) -> bool {
    if !part.contains(',') {
        return part.bytes().all(|b| b.is_ascii_digit());
    }
    let mut groups = part.split(',');
    let first_ok = groups
        .next()
        .map(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false);
    first_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Round to `decimals` places and drop trailing zeros: never pads.
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format!("{:.*}", decimals as usize, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Display string for a field value in the `target` system.
///
/// Non-numeric values and values without a unit come back verbatim
/// (suffixed with the raw unit when `include_unit` is set). Numeric values
/// in the other system are converted and rounded; values already in the
/// target system, or in an unknown unit, keep their text unless
/// `custom_decimals` asks for re-rounding.
pub fn format_field_value(
    target: UnitSystem,
    value: &str,
    source_unit: Option<&str>,
    include_unit: bool,
    custom_decimals: Option<u32>,
) -> String {
    let unit = source_unit.map(str::trim).filter(|u| !u.is_empty());

    let (Some(number), Some(unit)) = (parse_numeric(value), unit) else {
        return with_unit(value.to_string(), unit.filter(|_| include_unit));
    };

    match convert_value(target, number, unit) {
        Some((converted, target_unit)) => {
            let text = format_number(converted, custom_decimals.unwrap_or(DEFAULT_DECIMALS));
            with_unit(text, include_unit.then_some(target_unit))
        }
        None => {
            let text = match custom_decimals {
                Some(decimals) => format_number(number, decimals),
                None => value.trim().to_string(),
            };
            let display_unit = normalize_uom(unit);
            with_unit(text, include_unit.then_some(display_unit.as_str()))
        }
    }
}

fn with_unit(text: String, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{} {}", text, unit),
        None => text,
    }
}
