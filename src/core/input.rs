//! Canonicalization of typed amounts.
//!
//! The normalizer is called with the full text after every edit, so it has to
//! accept transitional forms such as `""`, `"0."` or `"12."` and must map its
//! own output onto itself.

/// Largest amount accepted from typed input.
pub const MAX_AMOUNT: f64 = 9_999_999_999.0;

const MAX_FRACTION_DIGITS: usize = 2;

/// Normalizes `raw`, keeping `previous` when the edit is rejected.
pub fn normalize_amount(raw: &str, previous: &str) -> String {
    sanitize_amount(raw).unwrap_or_else(|| previous.to_string())
}

/// Returns the canonical form of `raw`, or `None` if the edit should be rejected.
pub fn sanitize_amount(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = cleaned.split('.');
    let mut integer = parts.next().unwrap_or_default().to_string();
    let fraction = parts.next();

    if integer.len() > 1 {
        integer = integer.trim_start_matches('0').to_string();
        if integer.is_empty() {
            integer.push('0');
        }
    }

    let normalized = match fraction {
        Some(fraction) => {
            let end = fraction.len().min(MAX_FRACTION_DIGITS);
            format!("{integer}.{}", &fraction[..end])
        }
        None => integer,
    };

    match normalized.parse::<f64>() {
        Ok(value) if value > MAX_AMOUNT => Some(format!("{MAX_AMOUNT}")),
        Ok(value) if value < 0.0 => Some("0".to_string()),
        Ok(_) => Some(normalized),
        Err(_) if normalized.is_empty() || normalized == "0." => Some(normalized),
        Err(_) => None,
    }
}

/// Numeric value of a canonical amount; anything unparsable counts as zero.
pub fn parse_amount(canonical: &str) -> f64 {
    canonical
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
