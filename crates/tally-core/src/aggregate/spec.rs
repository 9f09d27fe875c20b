//! Module: aggregate::spec
//! Responsibility: declarative aggregator contracts and their schema validation.
//! Does not own: reducer state machines or grouping.

use crate::{DEFAULT_TOP_K, aggregate::validate_quantile, error::Error, table::Schema};
use serde::Serialize;

///
/// AggregateKind
///
/// Parameter-free tag for one aggregate output column.
/// `Share` is derived from another column by `SummaryTable::with_share`
/// rather than reduced from table rows.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum AggregateKind {
    Count,
    DistinctCount,
    Max,
    Mean,
    Min,
    Quantile,
    Share,
    Sum,
    TopK,
}

impl AggregateKind {
    /// Returns true when this kind only accepts numeric target columns.
    #[must_use]
    pub const fn requires_numeric(self) -> bool {
        matches!(self, Self::Sum | Self::Mean | Self::Quantile)
    }

    /// Returns true when outputs of this kind have a scalar sort order.
    #[must_use]
    pub const fn is_sortable(self) -> bool {
        !matches!(self, Self::TopK)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::DistinctCount => "distinct_count",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Quantile => "quantile",
            Self::Share => "share",
            Self::Sum => "sum",
            Self::TopK => "top_k",
        }
    }
}

///
/// Reduction
///
/// Reduction kind plus its parameters.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reduction {
    Count,
    DistinctCount,
    Max,
    Mean,
    Min,
    Quantile(f64),
    Sum,
    TopK(usize),
}

impl Reduction {
    #[must_use]
    pub const fn kind(self) -> AggregateKind {
        match self {
            Self::Count => AggregateKind::Count,
            Self::DistinctCount => AggregateKind::DistinctCount,
            Self::Max => AggregateKind::Max,
            Self::Mean => AggregateKind::Mean,
            Self::Min => AggregateKind::Min,
            Self::Quantile(_) => AggregateKind::Quantile,
            Self::Sum => AggregateKind::Sum,
            Self::TopK(_) => AggregateKind::TopK,
        }
    }
}

///
/// Aggregator
///
/// One reduction applied to one column within each group.
/// The output column is named `alias` when set, otherwise `kind(column)`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Aggregator {
    column: String,
    reduction: Reduction,
    alias: Option<String>,
}

impl Aggregator {
    pub fn new(column: impl Into<String>, reduction: Reduction) -> Self {
        Self {
            column: column.into(),
            reduction,
            alias: None,
        }
    }

    pub fn sum(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::Sum)
    }

    pub fn mean(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::Mean)
    }

    /// Row count per group, missing cells included.
    pub fn count(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::Count)
    }

    pub fn distinct_count(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::DistinctCount)
    }

    /// Linear-interpolated quantile; `p` is validated when the request runs.
    pub fn quantile(column: impl Into<String>, p: f64) -> Self {
        Self::new(column, Reduction::Quantile(p))
    }

    pub fn top_k(column: impl Into<String>, k: usize) -> Self {
        Self::new(column, Reduction::TopK(k))
    }

    /// Top-k frequency with the default bound.
    pub fn top(column: impl Into<String>) -> Self {
        Self::top_k(column, DEFAULT_TOP_K)
    }

    pub fn min(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::Min)
    }

    pub fn max(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::Max)
    }

    /// Rename the output column.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub const fn reduction(&self) -> Reduction {
        self.reduction
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.reduction.kind()
    }

    /// Output column name in the produced summary table.
    #[must_use]
    pub fn output_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }

        let column = &self.column;
        match self.reduction {
            Reduction::Quantile(p) => format!("quantile({column}, {p})"),
            Reduction::TopK(k) => format!("top_k({column}, {k})"),
            other => format!("{}({column})", other.kind().label()),
        }
    }

    /// Validate this aggregator against `schema`, returning the target slot.
    pub(crate) fn resolve(&self, schema: &Schema) -> Result<usize, Error> {
        let kind = self.kind();
        let slot = if kind.requires_numeric() {
            schema.resolve_numeric(&self.column, kind.label())?
        } else {
            schema.resolve(&self.column)?.0
        };

        match self.reduction {
            Reduction::Quantile(p) => validate_quantile(p)?,
            Reduction::TopK(0) => {
                return Err(Error::InvalidTopK {
                    column: self.column.clone(),
                });
            }
            _ => {}
        }

        Ok(slot)
    }
}
