
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Attribute value vocabulary shared by records, queries, and relation
/// definitions. Variants cover what relational storage layers commonly
/// hand back for a row attribute; richer domain types live behind the
/// record implementations, not here.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Whether the value counts as empty for fallback purposes.
    ///
    /// Null, false, numeric zero, empty text, and empty lists are all
    /// empty; everything else is a real value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(flag) => !flag,
            Self::Int(value) => *value == 0,
            Self::Uint(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Uint(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

///
/// NumericRepr
///
/// Normalized numeric view used by the loose comparator. Text parses
/// into the integer family first so large integers keep full precision.
///

enum NumericRepr {
    Int(i128),
    Float(f64),
    None,
}

fn numeric_repr(value: &Value) -> NumericRepr {
    match value {
        Value::Int(value) => NumericRepr::Int(i128::from(*value)),
        Value::Uint(value) => NumericRepr::Int(i128::from(*value)),
        Value::Float(value) => NumericRepr::Float(*value),
        Value::Text(text) => {
            let trimmed = text.trim();
            trimmed.parse::<i128>().map_or_else(
                |_| {
                    trimmed
                        .parse::<f64>()
                        .map_or(NumericRepr::None, NumericRepr::Float)
                },
                NumericRepr::Int,
            )
        }
        _ => NumericRepr::None,
    }
}

/// Normalized key comparison tolerating representation drift between
/// storage layers.
///
/// Same-variant values compare structurally. Values from different
/// numeric families compare numerically, and text compares against
/// numbers by parsing. Booleans and nulls never coerce.
#[must_use]
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }

    match (left, right) {
        (Value::List(left_items), Value::List(right_items)) => {
            left_items.len() == right_items.len()
                && left_items
                    .iter()
                    .zip(right_items)
                    .all(|(left_item, right_item)| loose_eq(left_item, right_item))
        }
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => false,
        _ => match (numeric_repr(left), numeric_repr(right)) {
            (NumericRepr::Int(a), NumericRepr::Int(b)) => a == b,
            #[allow(clippy::cast_precision_loss)]
            (NumericRepr::Int(a), NumericRepr::Float(b))
            | (NumericRepr::Float(b), NumericRepr::Int(a)) => (a as f64) == b,
            (NumericRepr::Float(a), NumericRepr::Float(b)) => a == b,
            _ => false,
        },
    }
}
