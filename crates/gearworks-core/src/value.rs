//! Numeric coercion of raw catalogue fields.
//!
//! Raw stats and slots arrive as strings. Anything that starts with an
//! integer is stored as [`FieldValue::Int`]; everything else keeps its text.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A coerced stat or slot field: an integer when the raw text starts with
/// one, otherwise the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// Coerce a raw field. Pure; never fails.
    pub fn coerce(raw: &str) -> Self {
        match parse_leading_int(raw) {
            Some(value) => FieldValue::Int(value),
            None => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    /// Text form of the value. Slot references that happen to be numeric
    /// are coerced too, so resolution goes through this.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Int(value) => value.to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// Parse the integer at the start of `raw`.
///
/// Accepts optional leading whitespace, an optional sign and at least one
/// ASCII digit; anything after the digits is ignored (`"12%"` is 12,
/// `"1.5"` is 1). Returns `None` when there are no leading digits or the
/// value does not fit in an `i64`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

// ---------------------------------------------------------------------------
// Cost
// ---------------------------------------------------------------------------

/// A build cost. `Invalid` is the not-a-number sentinel produced when the raw
/// cost does not parse; it is serialized as `null` and is never treated as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum Cost {
    Valid(i64),
    Invalid,
}

impl Cost {
    pub const ZERO: Cost = Cost::Valid(0);

    pub fn parse(raw: &str) -> Self {
        parse_leading_int(raw).map_or(Cost::Invalid, Cost::Valid)
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Cost::Valid(_))
    }

    pub fn value(self) -> Option<i64> {
        match self {
            Cost::Valid(value) => Some(value),
            Cost::Invalid => None,
        }
    }

    /// Add two costs. An invalid operand poisons the sum. Returns `None`
    /// only when the integer addition overflows.
    pub fn checked_add(self, other: Cost) -> Option<Cost> {
        match (self, other) {
            (Cost::Valid(a), Cost::Valid(b)) => a.checked_add(b).map(Cost::Valid),
            _ => Some(Cost::Invalid),
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::ZERO
    }
}

impl From<Option<i64>> for Cost {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Cost::Invalid, Cost::Valid)
    }
}

impl From<Cost> for Option<i64> {
    fn from(cost: Cost) -> Self {
        cost.value()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Valid(value) => write!(f, "{value}"),
            Cost::Invalid => f.write_str("NaN"),
        }
    }
}
