//! Display formatting for summary cards and tables.

use rust_decimal::Decimal;

/// `$1,234.56`; negatives as `-$5.00`.
pub fn money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `12.34%`.
pub fn percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// Optional cells render as an empty string.
pub fn optional(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
