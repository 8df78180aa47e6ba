//! Parameter and argument values.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::sampler::ReadoutSampler;

/// A single parameter or gate-argument value.
///
/// Infinite floats are written as the strings `"inf"` / `"-inf"` so that
/// persisted records stay valid JSON; they are read back as floats only
/// where the field is typed as a number (see the `lifetime` adapter), so
/// text such as an output bit named `inf` survives unchanged. A sampler is
/// written as the marker `true` and must be re-attached after loading.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A real number.
    Float(f64),
    /// A flag.
    Bool(bool),
    /// A name, typically a classical output bit.
    Text(String),
    /// Explicitly absent.
    Unset,
    /// A live readout sampler.
    Sampler(ReadoutSampler),
}

impl Value {
    /// The float value, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The flag value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The sampler, if one is attached.
    pub fn as_sampler(&self) -> Option<&ReadoutSampler> {
        match self {
            Value::Sampler(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is [`Value::Unset`].
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Unset => write!(f, "unset"),
            Value::Sampler(s) => write!(f, "sampler(readout_error={})", s.readout_error()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<ReadoutSampler> for Value {
    fn from(s: ReadoutSampler) -> Self {
        Value::Sampler(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Unset, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Float(v) if v.is_infinite() => {
                serializer.serialize_str(if *v > 0.0 { "inf" } else { "-inf" })
            }
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Unset => serializer.serialize_none(),
            Value::Sampler(_) => serializer.serialize_bool(true),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Float(f64),
    Text(String),
    Unset,
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::Float(v) => Value::Float(v),
            RawValue::Text(s) => Value::Text(s),
            RawValue::Unset => Value::Unset,
        })
    }
}

/// Serde adapter for optional lifetimes that may be infinite.
pub(crate) mod lifetime {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Value;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Float(v) => Ok(Some(v)),
            Value::Text(s) if s == "inf" => Ok(Some(f64::INFINITY)),
            Value::Text(s) if s == "-inf" => Ok(Some(f64::NEG_INFINITY)),
            Value::Unset => Ok(None),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or \"inf\", got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinity_is_written_as_text() {
        let json = serde_json::to_string(&Value::Float(f64::INFINITY)).unwrap();
        assert_eq!(json, "\"inf\"");
        let json = serde_json::to_string(&Value::Float(f64::NEG_INFINITY)).unwrap();
        assert_eq!(json, "\"-inf\"");
    }

    #[test]
    fn test_text_named_inf_stays_text() {
        let back: Value = serde_json::from_str("\"inf\"").unwrap();
        assert_eq!(back, Value::Text("inf".into()));
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Lifetime {
        #[serde(with = "lifetime")]
        t1: Option<f64>,
    }

    #[test]
    fn test_lifetime_reads_infinity() {
        let record = Lifetime {
            t1: Some(f64::INFINITY),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"t1":"inf"}"#);
        assert_eq!(serde_json::from_str::<Lifetime>(&json).unwrap(), record);
        assert!(serde_json::from_str::<Lifetime>(r#"{"t1":"never"}"#).is_err());
    }

    #[test]
    fn test_integers_read_as_floats() {
        let v: Value = serde_json::from_str("30000").unwrap();
        assert_eq!(v, Value::Float(30000.0));
    }

    #[test]
    fn test_null_is_unset() {
        let v: Value = serde_json::from_str("null").unwrap();
        assert!(v.is_unset());
        assert_eq!(serde_json::to_string(&Value::Unset).unwrap(), "null");
    }

    #[test]
    fn test_sampler_marker() {
        let sampler = ReadoutSampler::uniform(crate::sampler::seeded_rng(0));
        let json = serde_json::to_string(&Value::Sampler(sampler)).unwrap();
        assert_eq!(json, "true");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Bool(true));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(2.0)), Value::Float(2.0));
        assert_eq!(Value::from(None::<f64>), Value::Unset);
    }
}
