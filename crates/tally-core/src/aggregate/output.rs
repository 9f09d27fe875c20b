use crate::{aggregate::AggregateKind, value::Value};
use serde::Serialize;

///
/// Frequency
/// one value and the number of rows holding it
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Frequency {
    pub value: Value,
    pub count: u64,
}

///
/// AggregateValue
///
/// Reduced value of one aggregator over one group.
/// `used` records how many non-missing cells fed a numeric reduction.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum AggregateValue {
    Count(u64),
    DistinctCount(u64),
    Max(Value),
    Mean { mean: Option<f64>, used: u64 },
    Min(Value),
    Quantile(Option<f64>),
    Share(f64),
    Sum { total: f64, used: u64 },
    TopK(Vec<Frequency>),
}

impl AggregateValue {
    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        match self {
            Self::Count(_) => AggregateKind::Count,
            Self::DistinctCount(_) => AggregateKind::DistinctCount,
            Self::Max(_) => AggregateKind::Max,
            Self::Mean { .. } => AggregateKind::Mean,
            Self::Min(_) => AggregateKind::Min,
            Self::Quantile(_) => AggregateKind::Quantile,
            Self::Share(_) => AggregateKind::Share,
            Self::Sum { .. } => AggregateKind::Sum,
            Self::TopK(_) => AggregateKind::TopK,
        }
    }

    /// Scalar view used for sorting, shares, and quantiles over outputs.
    ///
    /// `None` for undefined results (mean or quantile of no values, min/max
    /// of a non-numeric or empty column) and for `TopK`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Count(n) | Self::DistinctCount(n) => Some(*n as f64),
            Self::Max(v) | Self::Min(v) => v.as_f64(),
            Self::Mean { mean, .. } => *mean,
            Self::Quantile(q) => *q,
            Self::Share(s) => Some(*s),
            Self::Sum { total, .. } => Some(*total),
            Self::TopK(_) => None,
        }
    }

    /// Non-missing cell count consumed by `Sum`/`Mean`.
    #[must_use]
    pub const fn used(&self) -> Option<u64> {
        match self {
            Self::Mean { used, .. } | Self::Sum { used, .. } => Some(*used),
            _ => None,
        }
    }

    /// Frequencies held by a `TopK` output.
    #[must_use]
    pub fn frequencies(&self) -> Option<&[Frequency]> {
        match self {
            Self::TopK(entries) => Some(entries),
            _ => None,
        }
    }
}
