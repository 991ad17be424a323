//! Positional argument values for message templates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type for message template arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<usize> for FieldValue {
    fn from(i: usize) -> Self {
        i64::try_from(i)
            .map(FieldValue::Int)
            .unwrap_or_else(|_| FieldValue::String(i.to_string()))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Positional arguments normalized to one array form
///
/// Every call shape (no arguments, one to three values, or an arbitrary
/// vector or slice) converts into the same representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogArgs(Vec<FieldValue>);

impl LogArgs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[FieldValue] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<FieldValue> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<()> for LogArgs {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

impl<A: Into<FieldValue>> From<(A,)> for LogArgs {
    fn from((a,): (A,)) -> Self {
        Self(vec![a.into()])
    }
}

impl<A: Into<FieldValue>, B: Into<FieldValue>> From<(A, B)> for LogArgs {
    fn from((a, b): (A, B)) -> Self {
        Self(vec![a.into(), b.into()])
    }
}

impl<A: Into<FieldValue>, B: Into<FieldValue>, C: Into<FieldValue>> From<(A, B, C)> for LogArgs {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self(vec![a.into(), b.into(), c.into()])
    }
}

impl From<Vec<FieldValue>> for LogArgs {
    fn from(values: Vec<FieldValue>) -> Self {
        Self(values)
    }
}

impl From<&[FieldValue]> for LogArgs {
    fn from(values: &[FieldValue]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[FieldValue; N]> for LogArgs {
    fn from(values: [FieldValue; N]) -> Self {
        Self(values.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_arity_normalizes_to_vec() {
        assert!(LogArgs::from(()).is_empty());
        assert_eq!(LogArgs::from((1,)).as_slice(), &[FieldValue::Int(1)]);
        assert_eq!(
            LogArgs::from(("a", 2)).as_slice(),
            &[FieldValue::String("a".into()), FieldValue::Int(2)]
        );
        assert_eq!(LogArgs::from((true, 1.5, "x")).len(), 3);

        let many: Vec<FieldValue> = (0..5).map(FieldValue::from).collect();
        assert_eq!(LogArgs::from(many.clone()).into_vec(), many);
        assert_eq!(LogArgs::from(many.as_slice()).len(), 5);
        assert_eq!(LogArgs::from([FieldValue::Null, FieldValue::Bool(false)]).len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("text").to_string(), "text");
        assert_eq!(FieldValue::from(42).to_string(), "42");
        assert_eq!(FieldValue::from(None::<i32>).to_string(), "null");
    }
}
