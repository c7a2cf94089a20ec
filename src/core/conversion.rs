//! Cross-rate and commission arithmetic over a currency catalog.
use crate::core::currency::CurrencyCatalog;
use serde::{Deserialize, Serialize};

const MAX_PERCENTAGE: f64 = 100.0;
const MAX_FIXED_FEE: f64 = 999_999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionKind {
    #[default]
    Percentage,
    #[serde(alias = "fixed_fee")]
    Fixed,
}

impl std::fmt::Display for CommissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionKind::Percentage => write!(f, "percentage"),
            CommissionKind::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for CommissionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "pct" | "%" => Ok(CommissionKind::Percentage),
            "fixed" | "fee" => Ok(CommissionKind::Fixed),
            _ => Err(anyhow::anyhow!("Invalid commission type: {}", s)),
        }
    }
}

/// A transfer cost charged on the source amount.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Commission {
    pub kind: CommissionKind,
    pub value: f64,
}

impl Commission {
    pub fn new(kind: CommissionKind, value: f64) -> Self {
        Self {
            kind,
            value: value.max(0.0),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a commission from free-text input, see [`Commission::sanitize_value`].
    pub fn from_input(kind: CommissionKind, raw: &str) -> Self {
        Self::new(kind, Self::sanitize_value(kind, raw))
    }

    /// Parses a typed commission value.
    ///
    /// Non numeric characters are dropped, unparsable input counts as zero, and
    /// the result is capped (100 for a percentage, 999999 for a fixed fee) and
    /// rounded to two decimals.
    pub fn sanitize_value(kind: CommissionKind, raw: &str) -> f64 {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let value = match leading_decimal(&cleaned).parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => v,
            _ => return 0.0,
        };

        let max = match kind {
            CommissionKind::Percentage => MAX_PERCENTAGE,
            CommissionKind::Fixed => MAX_FIXED_FEE,
        };
        (value.min(max) * 100.0).round() / 100.0
    }

    /// Cost charged on `amount`, clamped to `[0, amount]`.
    pub fn cost(&self, amount: f64) -> f64 {
        let cost = match self.kind {
            CommissionKind::Percentage => amount * (self.value / 100.0),
            CommissionKind::Fixed => self.value,
        };
        cost.min(amount).max(0.0)
    }
}

// Longest prefix made of digits and at most one '.'.
fn leading_decimal(s: &str) -> &str {
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
            }
            false
        })
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionQuote {
    pub cross_rate: f64,
    pub gross_converted: f64,
    pub cost: f64,
    pub net_received: f64,
}

/// Rate converting one unit of `from` into `to`.
///
/// Codes missing from the catalog count as rate 1, so an unknown code is a
/// silent no-op rather than an error.
pub fn cross_rate(catalog: &CurrencyCatalog, from: &str, to: &str) -> f64 {
    let from_rate = usable_rate(catalog, from);
    let to_rate = usable_rate(catalog, to);
    to_rate / from_rate
}

pub(crate) fn usable_rate(catalog: &CurrencyCatalog, code: &str) -> f64 {
    match catalog.rate(code) {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => 1.0,
    }
}

pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    commission: &Commission,
    catalog: &CurrencyCatalog,
) -> ConversionQuote {
    let rate = cross_rate(catalog, from, to);

    if from == to || amount <= 0.0 {
        return ConversionQuote {
            cross_rate: rate,
            gross_converted: amount,
            cost: 0.0,
            net_received: amount,
        };
    }

    let cost = commission.cost(amount);
    let net_amount = amount - cost;

    ConversionQuote {
        cross_rate: rate,
        gross_converted: amount * rate,
        cost,
        net_received: net_amount * rate,
    }
}
