//! Display formatting shared by every view.

/// Decimals used for the market rate line.
pub const RATE_DECIMALS: usize = 4;
/// Decimals used for amounts, costs and overview rates.
pub const AMOUNT_DECIMALS: usize = 2;

// Enough fraction digits to print any f64 exactly.
const EXACT_DIGITS: usize = 1100;

/// Rounds `value` to `max_decimals` and drops trailing zeros.
///
/// Rounding looks at the exact stored binary value: `0.015` is stored slightly
/// below the tie and prints as `"0.01"`. Exact ties round away from zero, so
/// `0.125` prints as `"0.13"`. Zero, including negative zero, prints as `"0"`.
pub fn format_max_decimals(value: f64, max_decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = round_half_up(value.abs(), max_decimals);
    let trimmed = if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits.as_str()
    };

    if trimmed.bytes().all(|b| b == b'0') {
        "0".to_string()
    } else if value.is_sign_negative() {
        format!("-{trimmed}")
    } else {
        trimmed.to_string()
    }
}

// Rounds a non-negative value to `decimals` digits, ties up, on its exact
// decimal expansion.
fn round_half_up(value: f64, decimals: usize) -> String {
    let exact = format!("{value:.EXACT_DIGITS$}");
    let (integer, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();
    let round_up = fraction.as_bytes().get(decimals).is_some_and(|b| *b >= b'5');

    let mut integer_len = integer.len();
    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            integer_len += 1;
        }
    }

    let mut out: String = digits[..integer_len]
        .iter()
        .map(|d| char::from(b'0' + d))
        .collect();
    if decimals > 0 {
        out.push('.');
        out.extend(digits[integer_len..].iter().map(|d| char::from(b'0' + d)));
    }
    out
}
