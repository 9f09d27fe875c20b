mod compare;
mod tag;


use crate::types::Float64;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

// re-exports
pub use compare::canonical_cmp;
pub(crate) use compare::predicate_cmp;
pub use tag::ValueKind;

///
/// Value
/// one typed table cell
///
/// Null     → missing cell (blank spreadsheet cell, NaN, unparsable input).
/// Category → enumerated label such as a season or a size; ordered by label.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Category(String),
    Float(Float64),
    Int(i64),
    Null,
    Text(String),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a category value from any string-like label.
    pub fn category(label: impl Into<String>) -> Self {
        Self::Category(label.into())
    }

    /// Build a text value from any string-like input.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Build a float value; non-finite inputs become `Null`.
    #[must_use]
    pub fn float(v: f64) -> Self {
        Float64::try_new(v).map_or(Self::Null, Self::Float)
    }

    ///
    /// TYPES
    ///

    /// Stable kind tag for diagnostics and type checks.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        tag::kind_of(self)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for the numeric variants (`Int`, `Float`).
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    ///
    /// CONVERSION
    ///

    /// Numeric view used by reducers; `None` for non-numeric and missing cells.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(f.get()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Category(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Total canonical comparator used by grouping, sorting, and predicates.
    #[must_use]
    pub fn canonical_cmp(left: &Self, right: &Self) -> Ordering {
        compare::canonical_cmp(left, right)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Category(s) | Self::Text(s) => write!(f, "{s}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Null => write!(f, "null"),
        }
    }
}

// Value ordering is the canonical total order, consistent with Eq.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        compare::canonical_cmp(self, other)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[macro_export]
macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool    => Bool,
    Float64 => Float,
    i8      => Int,
    i16     => Int,
    i32     => Int,
    i64     => Int,
    u8      => Int,
    u16     => Int,
    u32     => Int,
    &str    => Text,
    String  => Text,
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::float(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
