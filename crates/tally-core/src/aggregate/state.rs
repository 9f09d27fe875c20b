//! Module: aggregate::state
//! Responsibility: per-group reducer state machines.
//! Does not own: aggregator validation or group partitioning.

use crate::{
    aggregate::{AggregateValue, Frequency, Reduction, quantile_linear},
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// ReducerState
///
/// Accumulator for one aggregator within one group.
/// Missing cells are skipped by every reducer except `Count`.
///

pub(crate) enum ReducerState {
    Count(u64),
    DistinctCount(BTreeSet<Value>),
    Max(Option<Value>),
    Mean { total: f64, used: u64 },
    Min(Option<Value>),
    Quantile { p: f64, values: Vec<f64> },
    Sum { total: f64, used: u64 },
    TopK { k: usize, seen: FrequencyTally },
}

impl ReducerState {
    /// Build the initial reducer state for one reduction.
    #[must_use]
    pub(crate) fn for_reduction(reduction: Reduction) -> Self {
        match reduction {
            Reduction::Count => Self::Count(0),
            Reduction::DistinctCount => Self::DistinctCount(BTreeSet::new()),
            Reduction::Max => Self::Max(None),
            Reduction::Mean => Self::Mean {
                total: 0.0,
                used: 0,
            },
            Reduction::Min => Self::Min(None),
            Reduction::Quantile(p) => Self::Quantile {
                p,
                values: Vec::new(),
            },
            Reduction::Sum => Self::Sum {
                total: 0.0,
                used: 0,
            },
            Reduction::TopK(k) => Self::TopK {
                k,
                seen: FrequencyTally::default(),
            },
        }
    }

    /// Fold one cell of the target column into the reducer.
    pub(crate) fn update(&mut self, value: &Value) {
        if let Self::Count(count) = self {
            *count = count.saturating_add(1);
            return;
        }
        if value.is_null() {
            return;
        }

        match self {
            Self::Count(_) => {}
            Self::DistinctCount(set) => {
                if !set.contains(value) {
                    set.insert(value.clone());
                }
            }
            Self::Max(current) => {
                if current.as_ref().is_none_or(|c| value > c) {
                    *current = Some(value.clone());
                }
            }
            Self::Min(current) => {
                if current.as_ref().is_none_or(|c| value < c) {
                    *current = Some(value.clone());
                }
            }
            Self::Mean { total, used } | Self::Sum { total, used } => {
                if let Some(x) = value.as_f64() {
                    *total += x;
                    *used += 1;
                }
            }
            Self::Quantile { values, .. } => {
                if let Some(x) = value.as_f64() {
                    values.push(x);
                }
            }
            Self::TopK { seen, .. } => seen.observe(value),
        }
    }

    /// Convert reducer state into the aggregate output payload.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn finish(self) -> AggregateValue {
        match self {
            Self::Count(n) => AggregateValue::Count(n),
            Self::DistinctCount(set) => AggregateValue::DistinctCount(set.len() as u64),
            Self::Max(v) => AggregateValue::Max(v.unwrap_or(Value::Null)),
            Self::Min(v) => AggregateValue::Min(v.unwrap_or(Value::Null)),
            Self::Mean { total, used } => AggregateValue::Mean {
                mean: (used > 0).then(|| total / used as f64),
                used,
            },
            Self::Quantile { p, values } => AggregateValue::Quantile(quantile_linear(&values, p)),
            Self::Sum { total, used } => AggregateValue::Sum { total, used },
            Self::TopK { k, seen } => AggregateValue::TopK(seen.top(k)),
        }
    }
}

///
/// FrequencyTally
/// value counts kept in first-seen order
///

#[derive(Default)]
pub(crate) struct FrequencyTally {
    index: BTreeMap<Value, usize>,
    entries: Vec<Frequency>,
}

impl FrequencyTally {
    fn observe(&mut self, value: &Value) {
        if let Some(&slot) = self.index.get(value) {
            self.entries[slot].count += 1;
        } else {
            self.index.insert(value.clone(), self.entries.len());
            self.entries.push(Frequency {
                value: value.clone(),
                count: 1,
            });
        }
    }

    // stable sort keeps first-seen order among equal counts
    fn top(mut self, k: usize) -> Vec<Frequency> {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries.truncate(k);

        self.entries
    }
}
