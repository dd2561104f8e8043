//! Normalization of calendar display values to numbers.

use crate::error::{CoreError, Result};

/// Parse a calendar display value such as `3.1%`, `1,234`, `250K` or `1.2M`.
///
/// `%` and `,` are stripped, the value is trimmed and uppercased, then a
/// trailing `K` scales by 1,000 and a trailing `M` by 1,000,000 (space
/// before the suffix allowed). Anything else must parse as a plain `f64`.
pub fn clean_number(raw: &str) -> Result<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '%' | ',')).collect();
    let cleaned = cleaned.trim().to_uppercase();

    let (digits, scale) = if let Some(prefix) = cleaned.strip_suffix('K') {
        (prefix, 1_000.0)
    } else if let Some(prefix) = cleaned.strip_suffix('M') {
        (prefix, 1_000_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };

    digits
        .trim()
        .parse::<f64>()
        .map(|v| v * scale)
        .map_err(|_| CoreError::UnparsableNumber(raw.to_string()))
}
