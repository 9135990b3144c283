// ── Value payloads ──
//
// `ScalarValue` is what the host hands in (loosely typed, like a JSON
// scalar). `ValuePayload` is a reading or write typed to the value's
// `ValueType`. `NormalizedValue` is the host-facing record the
// marshaller builds from a `ValueId`.

use serde::{Deserialize, Serialize};

use super::value_id::{ValueGenre, ValueType};

/// A host-supplied scalar, coerced to the target value type on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Bool(b) => i64::from(*b),
            Self::Int(i) => *i,
            // Float-to-int `as` truncates toward zero and saturates.
            Self::Float(f) => *f as i64,
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                    .unwrap_or_default()
            }
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse().unwrap_or_default(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Coerce to the payload for `value_type`. Integers saturate at the
    /// target range. `None` for types that cannot be written.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn coerce(&self, value_type: ValueType) -> Option<ValuePayload> {
        let payload = match value_type {
            ValueType::Bool => ValuePayload::Bool(self.as_bool()),
            ValueType::Byte => ValuePayload::Byte(saturate(self.as_i64(), u8::MIN, u8::MAX)),
            ValueType::Short => ValuePayload::Short(saturate(self.as_i64(), i16::MIN, i16::MAX)),
            ValueType::Int => ValuePayload::Int(saturate(self.as_i64(), i32::MIN, i32::MAX)),
            ValueType::Decimal => ValuePayload::Decimal(self.as_f64() as f32),
            ValueType::List | ValueType::String => ValuePayload::String(self.as_text()),
            ValueType::Schedule | ValueType::Button | ValueType::Raw | ValueType::Unknown(_) => {
                return None;
            }
        };
        Some(payload)
    }
}

fn saturate<T: TryFrom<i64>>(value: i64, min: T, max: T) -> T {
    T::try_from(value).unwrap_or(if value < 0 { min } else { max })
}

/// A value reading or write, typed to the value's `ValueType`.
///
/// List values carry the selected item label as a `String`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValuePayload {
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Decimal(f32),
    String(String),
}

impl From<ValuePayload> for ScalarValue {
    fn from(payload: ValuePayload) -> Self {
        match payload {
            ValuePayload::Bool(b) => Self::Bool(b),
            ValuePayload::Byte(v) => Self::Int(i64::from(v)),
            ValuePayload::Short(v) => Self::Int(i64::from(v)),
            ValuePayload::Int(v) => Self::Int(i64::from(v)),
            ValuePayload::Decimal(v) => Self::Float(f64::from(v)),
            ValuePayload::String(s) => Self::Text(s),
        }
    }
}

/// Host-facing description of a value.
///
/// `value` is absent for button, schedule and raw types, and whenever
/// the live reading failed. `values` is present only for list types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedValue {
    pub value_id: String,
    pub id: u64,
    pub node_id: u8,
    pub class_id: u8,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub genre: ValueGenre,
    pub instance: u8,
    pub index: u8,
    pub label: String,
    pub units: String,
    pub read_only: bool,
    pub write_only: bool,
    pub min: i32,
    pub max: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValuePayload>,
}
