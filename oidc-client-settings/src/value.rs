use std::collections::{BTreeMap, HashMap};

use crate::error::SettingsError;
use crate::types::QueryParamValue;

/// A loosely typed settings value, as it arrives from YAML, environment
/// variables or a caller that does not hold a strict `bool`.
///
/// Behavior flags keep this shape until resolution, where they are coerced by
/// [`is_truthy`](SettingValue::is_truthy).
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<SettingValue>),
    Map(BTreeMap<String, SettingValue>),
}

impl SettingValue {
    /// Truthiness: `false`, `0`, `0.0`, NaN, `""` and null are falsy, every
    /// other value (including the strings `"false"` and `"0"`) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            SettingValue::Bool(b) => *b,
            SettingValue::Integer(i) => *i != 0,
            SettingValue::Float(f) => *f != 0.0 && !f.is_nan(),
            SettingValue::String(s) => !s.is_empty(),
            SettingValue::Null => false,
            SettingValue::List(_) | SettingValue::Map(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            SettingValue::String(_) => "string",
            SettingValue::Integer(_) => "integer",
            SettingValue::Float(_) => "float",
            SettingValue::Bool(_) => "bool",
            SettingValue::Null => "null",
            SettingValue::List(_) => "list",
            SettingValue::Map(_) => "map",
        }
    }

    pub(crate) fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Bool(b) => SettingValue::Bool(*b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SettingValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    SettingValue::Float(f)
                } else {
                    SettingValue::String(n.to_string())
                }
            }
            serde_yaml::Value::String(s) => SettingValue::String(s.clone()),
            serde_yaml::Value::Null => SettingValue::Null,
            serde_yaml::Value::Sequence(seq) => {
                SettingValue::List(seq.iter().map(SettingValue::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut result = BTreeMap::new();
                for (k, v) in map {
                    let key = match k {
                        serde_yaml::Value::String(s) => s.clone(),
                        other => format!("{other:?}"),
                    };
                    result.insert(key, SettingValue::from_yaml(v));
                }
                SettingValue::Map(result)
            }
            serde_yaml::Value::Tagged(tagged) => SettingValue::from_yaml(&tagged.value),
        }
    }

    /// Convert to a JSON value. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SettingValue::String(s) => serde_json::Value::String(s.clone()),
            SettingValue::Integer(i) => serde_json::Value::from(*i),
            SettingValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SettingValue::Bool(b) => serde_json::Value::Bool(*b),
            SettingValue::Null => serde_json::Value::Null,
            SettingValue::List(items) => {
                serde_json::Value::Array(items.iter().map(SettingValue::to_json).collect())
            }
            SettingValue::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Integer(value.into())
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SettingValue::Null, Into::into)
    }
}

/// Conversion from a [`SettingValue`] into a concrete settings field type.
pub trait FromSettingValue: Sized {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError>;
}

fn mismatch(key: &str, expected: &'static str) -> SettingsError {
    SettingsError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

impl FromSettingValue for String {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        match value {
            SettingValue::String(s) => Ok(s.clone()),
            SettingValue::Integer(i) => Ok(i.to_string()),
            SettingValue::Float(f) => Ok(f.to_string()),
            SettingValue::Bool(b) => Ok(b.to_string()),
            _ => Err(mismatch(key, "string")),
        }
    }
}

impl FromSettingValue for u64 {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        match value {
            SettingValue::Integer(i) => u64::try_from(*i).map_err(|_| mismatch(key, "u64")),
            SettingValue::String(s) => s.trim().parse().map_err(|_| mismatch(key, "u64")),
            _ => Err(mismatch(key, "u64")),
        }
    }
}

impl FromSettingValue for serde_json::Value {
    fn from_setting_value(value: &SettingValue, _key: &str) -> Result<Self, SettingsError> {
        Ok(value.to_json())
    }
}

impl FromSettingValue for QueryParamValue {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        match value {
            SettingValue::String(s) => Ok(QueryParamValue::String(s.clone())),
            SettingValue::Integer(i) => Ok(QueryParamValue::Integer(*i)),
            SettingValue::Float(f) => Ok(QueryParamValue::Float(*f)),
            SettingValue::Bool(b) => Ok(QueryParamValue::Bool(*b)),
            _ => Err(mismatch(key, "string, number or bool")),
        }
    }
}

impl<T: FromSettingValue> FromSettingValue for Option<T> {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        match value {
            SettingValue::Null => Ok(None),
            v => T::from_setting_value(v, key).map(Some),
        }
    }
}

impl<T: FromSettingValue> FromSettingValue for Vec<T> {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        match value {
            SettingValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| T::from_setting_value(v, &format!("{key}[{i}]")))
                .collect(),
            _ => Err(mismatch(key, "list")),
        }
    }
}

impl<V: FromSettingValue> FromSettingValue for BTreeMap<String, V> {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        match value {
            SettingValue::Map(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), V::from_setting_value(v, &format!("{key}.{k}"))?)))
                .collect(),
            _ => Err(mismatch(key, "map")),
        }
    }
}

impl<V: FromSettingValue> FromSettingValue for HashMap<String, V> {
    fn from_setting_value(value: &SettingValue, key: &str) -> Result<Self, SettingsError> {
        BTreeMap::<String, V>::from_setting_value(value, key).map(|m| m.into_iter().collect())
    }
}
