// Argument shapes accepted by the query operations
//
// Callers say whether they pass one item or a list. Dynamic (JSON) arguments are
// converted here and rejected with a descriptive error when the shape is wrong.

use serde_json::Value;
use std::fmt;

use super::params::{ParameterSet, ParameterValue};

/// One item or an ordered list of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl From<String> for OneOrMany<String> {
    fn from(item: String) -> Self {
        OneOrMany::One(item)
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(item: &str) -> Self {
        OneOrMany::One(item.to_string())
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(items: Vec<String>) -> Self {
        OneOrMany::Many(items)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(items: Vec<&str>) -> Self {
        OneOrMany::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<ParameterSet> for OneOrMany<ParameterSet> {
    fn from(set: ParameterSet) -> Self {
        OneOrMany::One(set)
    }
}

impl From<Vec<ParameterSet>> for OneOrMany<ParameterSet> {
    fn from(sets: Vec<ParameterSet>) -> Self {
        OneOrMany::Many(sets)
    }
}

/// Parameter sets merged by `add_params`, applied in order
pub type Additions = OneOrMany<ParameterSet>;

/// A dynamic argument had a shape the operation cannot use
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentError {
    /// Expected a string/number or a list of them
    NotScalarOrList { argument: &'static str, found: &'static str },
    /// Expected an object of parameters
    NotParameterSet { argument: &'static str, found: &'static str },
    /// A parameter value was an object or a list containing non-scalars
    UnsupportedValue { argument: &'static str, key: String, found: &'static str },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::NotScalarOrList { argument, found } => write!(
                f,
                "'{}' must be a string, a number, or a list of them (got {})",
                argument, found
            ),
            ArgumentError::NotParameterSet { argument, found } => write!(
                f,
                "'{}' must be an object of parameters or a list of such objects (got {})",
                argument, found
            ),
            ArgumentError::UnsupportedValue { argument, key, found } => write!(
                f,
                "'{}' has an unsupported value for key '{}': expected a scalar or a list of scalars (got {})",
                argument, key, found
            ),
        }
    }
}

impl std::error::Error for ArgumentError {}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// Form-encoding renders booleans as 1/0
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        _ => None,
    }
}

impl OneOrMany<String> {
    /// Keys or values: a string/number, or a list of strings/numbers. `null` is an empty list.
    pub fn from_json(argument: &'static str, value: &Value) -> Result<Self, ArgumentError> {
        let not_scalar = |found: &Value| ArgumentError::NotScalarOrList {
            argument,
            found: kind_of(found),
        };

        match value {
            Value::Null => Ok(OneOrMany::Many(Vec::new())),
            Value::String(_) | Value::Number(_) => {
                scalar_to_string(value).map(OneOrMany::One).ok_or_else(|| not_scalar(value))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(_) | Value::Number(_) => {
                        scalar_to_string(item).ok_or_else(|| not_scalar(item))
                    }
                    other => Err(not_scalar(other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(OneOrMany::Many),
            other => Err(not_scalar(other)),
        }
    }
}

impl ParameterSet {
    /// An object whose values are scalars or lists of scalars. `null` entries are skipped.
    pub fn from_json(argument: &'static str, value: &Value) -> Result<Self, ArgumentError> {
        if value.is_null() {
            return Ok(ParameterSet::new());
        }
        let object = value.as_object().ok_or(ArgumentError::NotParameterSet {
            argument,
            found: kind_of(value),
        })?;

        let mut set = ParameterSet::new();
        for (key, entry) in object {
            let unsupported = |found: &Value| ArgumentError::UnsupportedValue {
                argument,
                key: key.clone(),
                found: kind_of(found),
            };

            let parsed = match entry {
                Value::Null => continue,
                Value::Array(items) => ParameterValue::Many(
                    items
                        .iter()
                        .map(|item| scalar_to_string(item).ok_or_else(|| unsupported(item)))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                scalar => ParameterValue::Single(
                    scalar_to_string(scalar).ok_or_else(|| unsupported(scalar))?,
                ),
            };
            set.insert(key.clone(), parsed);
        }

        Ok(set)
    }
}

impl Additions {
    /// One object of parameters, or a list of objects merged in order
    pub fn from_json(argument: &'static str, value: &Value) -> Result<Self, ArgumentError> {
        match value {
            Value::Null => Ok(OneOrMany::Many(Vec::new())),
            Value::Object(_) => ParameterSet::from_json(argument, value).map(OneOrMany::One),
            Value::Array(items) => items
                .iter()
                .map(|item| ParameterSet::from_json(argument, item))
                .collect::<Result<Vec<_>, _>>()
                .map(OneOrMany::Many),
            other => Err(ArgumentError::NotParameterSet {
                argument,
                found: kind_of(other),
            }),
        }
    }
}
