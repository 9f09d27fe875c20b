use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ValueKind
///
/// Stable value-variant tag used by type checks, diagnostics, and ordering.
///
/// IMPORTANT:
/// The rank is part of the canonical order and must remain fixed; `Null`
/// ranks lowest so missing-value groups sort first under key ordering.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Category,
}

impl ValueKind {
    /// Canonical cross-variant rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool => 1,
            Self::Int => 2,
            Self::Float => 3,
            Self::Text => 4,
            Self::Category => 5,
        }
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Text => "Text",
            Self::Category => "Category",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[must_use]
pub(super) const fn kind_of(value: &Value) -> ValueKind {
    match value {
        Value::Bool(_) => ValueKind::Bool,
        Value::Category(_) => ValueKind::Category,
        Value::Float(_) => ValueKind::Float,
        Value::Int(_) => ValueKind::Int,
        Value::Null => ValueKind::Null,
        Value::Text(_) => ValueKind::Text,
    }
}
