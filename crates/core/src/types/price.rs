//! Price formatting for the storefront's locale (pt-BR, Brazilian real).

use rust_decimal::Decimal;

/// Currency prefix used by [`format_price`].
pub const CURRENCY_PREFIX: &str = "R$";

/// Format an amount as Brazilian currency, e.g. `R$ 1.234,50`.
///
/// Rounds to two decimal places, groups thousands with `.` and uses `,` as
/// the decimal separator.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{sign}{CURRENCY_PREFIX} {},{cents}",
        group_thousands(whole)
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
