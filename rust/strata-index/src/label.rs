//! Single-level label values and their semantic types.

use std::fmt;
use std::sync::Arc;

use ordered_float::OrderedFloat;

/// A hashable, totally ordered label value.
///
/// Floats are wrapped in [`OrderedFloat`] so that they participate in hashing
/// and ordering like every other label (`NaN` equals itself).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(Arc<str>),
}

impl Label {
    pub fn label_type(&self) -> LabelType {
        match self {
            Label::Bool(_) => LabelType::Bool,
            Label::Int(_) => LabelType::Int,
            Label::Float(_) => LabelType::Float,
            Label::Str(_) => LabelType::Str,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Label::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Bool(v) => write!(f, "{v}"),
            Label::Int(v) => write!(f, "{v}"),
            Label::Float(v) => write!(f, "{}", v.0),
            Label::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Str(v) => f.write_str(v),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

impl From<bool> for Label {
    fn from(value: bool) -> Self {
        Label::Bool(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Int(value as i64)
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Label::Float(OrderedFloat(value))
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.into())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value.into())
    }
}

impl From<&Label> for Label {
    fn from(value: &Label) -> Self {
        value.clone()
    }
}

/// Semantic type of the labels held by one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelType {
    Bool,
    Int,
    Float,
    Str,
    /// Labels of more than one type (or no known type).
    Mixed,
}

impl LabelType {
    /// Resolves the common type of a sequence of labels.
    ///
    /// Returns `None` for an empty sequence.
    pub fn common<'a>(labels: impl IntoIterator<Item = &'a Label>) -> Option<LabelType> {
        let mut result = None;
        for label in labels {
            let t = label.label_type();
            match result {
                None => result = Some(t),
                Some(current) if current != t => return Some(LabelType::Mixed),
                _ => (),
            }
        }
        result
    }

    /// Combines the types of two levels that are being merged.
    pub fn merge(self, other: LabelType) -> LabelType {
        if self == other { self } else { LabelType::Mixed }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LabelType::Bool => "bool",
            LabelType::Int => "int",
            LabelType::Float => "float",
            LabelType::Str => "str",
            LabelType::Mixed => "mixed",
        };
        f.write_str(name)
    }
}
