use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of subunits in one whole USDT or TRX (both use 6 decimals).
pub const SUBUNITS_PER_UNIT: u64 = 1_000_000;

/// Converts a raw subunit count into whole units.
pub fn from_subunits(subunits: u64) -> Decimal {
    Decimal::from(subunits) / Decimal::from(SUBUNITS_PER_UNIT)
}

/// Normalizes a raw 6-decimal token amount returned by the gateway.
///
/// Text containing a decimal point is taken as already scaled; anything else
/// is a subunit count. Unparseable or negative input yields zero so a single
/// bad entry never blocks the report.
pub fn parse_token_amount(raw: &str) -> Decimal {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null") {
        return Decimal::ZERO;
    }

    // exponent forms such as "1e6" or "1.5E+3" are accepted too
    let number = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s));
    let parsed = if s.contains('.') {
        number
    } else {
        number.map(|v| v / Decimal::from(SUBUNITS_PER_UNIT))
    };

    match parsed {
        Ok(v) if v.is_sign_negative() && !v.is_zero() => {
            log::warn!("Negative token amount treated as zero raw={}", s);
            Decimal::ZERO
        }
        Ok(v) => v,
        Err(e) => {
            log::warn!("Malformed token amount treated as zero raw={}: {}", s, e);
            Decimal::ZERO
        }
    }
}

/// Formats an amount with exactly `decimals` fractional digits and `,`
/// thousands separators, rounding half to even.
pub fn format_amount(amount: Decimal, decimals: u32) -> String {
    let mut rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(decimals);
    // -0.00 after rounding a tiny negative
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    let text = rounded.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    match digits.split_once('.') {
        Some((whole, frac)) => format!("{sign}{}.{frac}", group_thousands(whole)),
        None => format!("{sign}{}", group_thousands(digits)),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Masks an address down to its last 6 characters.
pub fn short_address(address: &str) -> String {
    let count = address.chars().count();
    let tail: String = address.chars().skip(count.saturating_sub(6)).collect();
    format!("...{tail}")
}

/// Formats a check time as `YYYY-MM-DD HH:MM UTC`.
pub fn format_check_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
