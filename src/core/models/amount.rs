use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use utoipa::ToSchema;

/// A money value as it came from the store, together with the decimal the
/// reconciler actually uses. Negative or unparseable inputs count as zero.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct RecordedAmount {
    #[schema(value_type = String, example = "45.00")]
    pub value: Decimal,
    #[schema(value_type = Object)]
    pub original: Value,
    pub coerced: bool,
}

impl RecordedAmount {
    pub fn new(value: Decimal) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            return RecordedAmount {
                value: Decimal::ZERO,
                original: Value::String(value.to_string()),
                coerced: true,
            };
        }
        RecordedAmount {
            value,
            original: Value::String(value.to_string()),
            coerced: false,
        }
    }

    pub fn from_raw(raw: &Value) -> Self {
        match parse_decimal(raw) {
            Some(value) if !value.is_sign_negative() || value.is_zero() => RecordedAmount {
                value,
                original: raw.clone(),
                coerced: false,
            },
            _ => RecordedAmount {
                value: Decimal::ZERO,
                original: raw.clone(),
                coerced: true,
            },
        }
    }
}

/// Reads a decimal out of a loosely typed store column: JSON numbers and
/// numeric strings are accepted, everything else is rejected.
pub fn parse_decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => parse_str(&n.to_string()),
        Value::String(s) => parse_str(s.trim()),
        _ => None,
    }
}

fn parse_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
}
