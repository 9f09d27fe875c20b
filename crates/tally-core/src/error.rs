use crate::{aggregate::AggregateKind, table::ColumnType, value::ValueKind};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured engine error with a stable classification.
/// Every failure surfaces to the caller immediately; nothing is retried.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum Error {
    #[error(
        "row {row} does not match the schema: missing columns [{}], unexpected columns [{}]",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    SchemaMismatch {
        row: usize,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("schema declares column '{column}' more than once")]
    DuplicateColumn { column: String },

    #[error("row {row}, column '{column}': expected {expected} value, found {found}")]
    TypeMismatch {
        row: usize,
        column: String,
        expected: ColumnType,
        found: ValueKind,
    },

    #[error("filter on column '{column}': cannot compare {expected} cells with a {found} literal")]
    LiteralMismatch {
        column: String,
        expected: ColumnType,
        found: ValueKind,
    },

    #[error("unknown column: '{column}'")]
    UnknownColumn { column: String },

    #[error("{operation} requires a numeric column, but '{column}' is {column_type}")]
    IncompatibleColumn {
        column: String,
        column_type: ColumnType,
        operation: &'static str,
    },

    #[error("quantile must lie in [0, 1], got {p}")]
    InvalidQuantile { p: f64 },

    #[error("top-k frequency on '{column}' requires k >= 1")]
    InvalidTopK { column: String },

    #[error("group key requires at least one column")]
    EmptyGroupKey,

    #[error("aggregation request requires at least one aggregator")]
    MissingAggregators,

    #[error("aggregation request produces output column '{name}' more than once")]
    DuplicateOutput { name: String },

    #[error("cannot sort by '{column}': {kind:?} values have no scalar order")]
    UnsortableColumn { column: String, kind: AggregateKind },

    #[error("{operation} requires a {expected}-level group key, found {found} level(s)")]
    KeyArity {
        operation: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid bins for column '{column}': {reason}")]
    InvalidBins { column: String, reason: String },

    #[error("pipeline declares request '{name}' more than once")]
    DuplicateRequest { name: String },

    #[error("request '{name}' failed: {source}")]
    Request {
        name: String,
        #[source]
        source: Box<Self>,
    },
}

impl Error {
    /// Construct an unknown-column error.
    pub(crate) fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Annotate an error with the pipeline request that produced it.
    pub(crate) fn in_request(self, name: impl Into<String>) -> Self {
        Self::Request {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Stable classification for this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::SchemaMismatch { .. } | Self::DuplicateColumn { .. } => ErrorClass::Schema,
            Self::TypeMismatch { .. }
            | Self::LiteralMismatch { .. }
            | Self::IncompatibleColumn { .. } => ErrorClass::Type,
            Self::UnknownColumn { .. } => ErrorClass::Column,
            Self::InvalidQuantile { .. }
            | Self::InvalidTopK { .. }
            | Self::EmptyGroupKey
            | Self::MissingAggregators
            | Self::DuplicateOutput { .. }
            | Self::UnsortableColumn { .. }
            | Self::KeyArity { .. }
            | Self::InvalidBins { .. } => ErrorClass::Argument,
            Self::DuplicateRequest { .. } | Self::Request { .. } => ErrorClass::Request,
        }
    }

    /// Strip request annotations and return the underlying failure.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Request { source, .. } => source.root(),
            other => other,
        }
    }

    /// Name of the pipeline request this error is attributed to, if any.
    #[must_use]
    pub fn request_name(&self) -> Option<&str> {
        match self {
            Self::Request { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Error taxonomy for caller-side classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Schema,
    Type,
    Column,
    Argument,
    Request,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Schema => "schema",
            Self::Type => "type",
            Self::Column => "column",
            Self::Argument => "argument",
            Self::Request => "request",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_annotation_preserves_root_error() {
        let err = Error::unknown_column("Nonexistent").in_request("category_sales");

        assert_eq!(err.request_name(), Some("category_sales"));
        assert_eq!(err.class(), ErrorClass::Request);
        assert!(matches!(
            err.root(),
            Error::UnknownColumn { column } if column == "Nonexistent"
        ));
        assert_eq!(
            err.to_string(),
            "request 'category_sales' failed: unknown column: 'Nonexistent'"
        );
    }

    #[test]
    fn display_with_class_prefixes_label() {
        let err = Error::InvalidQuantile { p: 1.5 };

        assert_eq!(
            err.display_with_class(),
            "argument: quantile must lie in [0, 1], got 1.5"
        );
    }

    #[test]
    fn schema_mismatch_lists_columns() {
        let err = Error::SchemaMismatch {
            row: 2,
            missing: vec!["Season".to_string()],
            unexpected: vec!["Saeson".to_string(), "Extra".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "row 2 does not match the schema: missing columns [Season], unexpected columns [Saeson, Extra]"
        );
    }
}
