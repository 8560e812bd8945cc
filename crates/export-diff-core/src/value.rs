//! Canonical value model
//!
//! Parsed entry content is converted into [`Value`], a closed tagged union
//! that distinguishes ordered sequences from unordered sets. Every value has
//! a total order so sets can contain arbitrary nested values, including maps.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A numeric scalar.
///
/// Equality is numeric: a float with no fractional part that fits in `i128`
/// is stored as [`Number::Integer`], so `1` equals `1.0` and `0.0` equals
/// `-0.0`. Build floats with [`Number::from_f64`] to keep that invariant.
/// Remaining floats compare by IEEE total order so the type can be `Eq` and
/// `Ord`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(i128),
    Float(f64),
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Integer(_), Self::Float(_)) => Ordering::Less,
            (Self::Float(_), Self::Integer(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Integer(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            Self::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        }
    }
}

impl Number {
    /// Store `f` as an integer when it has an exact integral value.
    pub fn from_f64(f: f64) -> Self {
        // i128::MAX as f64 rounds up to 2^127, so the upper bound is exclusive
        let in_range = f >= i128::MIN as f64 && f < i128::MAX as f64;
        if f.is_finite() && f.fract() == 0.0 && in_range {
            Self::Integer(f as i128)
        } else {
            Self::Float(f)
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Integer(i128::from(i))
        } else if let Some(u) = n.as_u64() {
            Self::Integer(i128::from(u))
        } else {
            Self::from_f64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

/// A leaf value compared by plain value equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(Number::Integer(i)) => {
                if let Ok(small) = i64::try_from(*i) {
                    serde_json::Value::from(small)
                } else if let Ok(big) = u64::try_from(*i) {
                    serde_json::Value::from(big)
                } else {
                    serde_json::Value::String(i.to_string())
                }
            }
            Self::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A normalized, comparison-ready value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// String-keyed mapping; key order is irrelevant.
    Map(BTreeMap<String, Value>),
    /// Ordered list; position is significant.
    Sequence(Vec<Value>),
    /// Unordered collection; duplicates collapse.
    Set(BTreeSet<Value>),
    Scalar(Scalar),
}

/// The variant case of a [`Value`], used when reporting shape mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Map,
    Sequence,
    Set,
    Scalar,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Map => "map",
            Self::Sequence => "sequence",
            Self::Set => "set",
            Self::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    pub fn integer(i: i64) -> Self {
        Self::Scalar(Scalar::Number(Number::Integer(i128::from(i))))
    }

    pub fn float(f: f64) -> Self {
        Self::Scalar(Scalar::Number(Number::from_f64(f)))
    }

    pub fn bool(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sequence(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Sequence(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(items.into_iter().collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Map(_) => ValueKind::Map,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Set(_) => ValueKind::Set,
            Self::Scalar(_) => ValueKind::Scalar,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` if this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Reinterpret a sequence as an unordered set.
    ///
    /// Sets are returned unchanged; any other value is returned as-is.
    pub fn into_set(self) -> Self {
        match self {
            Self::Sequence(items) => Self::Set(items.into_iter().collect()),
            other => other,
        }
    }

    /// Render back into JSON. Sets become arrays in canonical order.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Self::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Set(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Scalar(scalar) => scalar.to_json(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Self::Scalar(Scalar::Number(Number::from(&n))),
            serde_json::Value::String(s) => Self::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
