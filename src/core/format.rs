use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::splits::round_money;

/// `R$ 1234,50`: two decimals, comma separator, no thousands grouping.
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {}", two_places(amount).replace('.', ","))
}

pub fn format_usd(amount: Decimal) -> String {
    let formatted = two_places(amount.abs());
    if amount.is_sign_negative() && !round_money(amount).is_zero() {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

fn two_places(amount: Decimal) -> String {
    round_money(amount).to_string()
}

/// Relative age of `at` as shown in the activity list, in Portuguese.
/// Anything older than 30 days is shown as a date.
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if secs < 60 {
        "agora".to_string()
    } else if mins < 60 {
        format!("{} min atrás", mins)
    } else if hours < 24 {
        format!("{} horas atrás", hours)
    } else if days == 1 {
        "1 dia atrás".to_string()
    } else if days < 30 {
        format!("{} dias atrás", days)
    } else {
        at.format("%d/%m/%Y").to_string()
    }
}
