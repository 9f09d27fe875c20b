//! Module: request
//! Responsibility: declarative group-and-reduce requests and their execution.
//! Does not own: multi-request orchestration (see `pipeline`).

use crate::{
    aggregate::{Aggregator, ReducerState},
    error::Error,
    group::{GroupKey, partition},
    summary::{SummaryRow, SummaryTable},
    table::Table,
};
use serde::Serialize;
use std::collections::BTreeSet;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

///
/// SortTarget
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum SortTarget {
    /// The group key tuple, in canonical value order.
    Key,
    /// One output column of the summary, by scalar value.
    Column(String),
    /// One output column, ordered within each outer key: rows are grouped by
    /// every key level but the last (ascending) and sorted by the column
    /// inside each group.
    ColumnWithinOuterKey(String),
}

impl SortTarget {
    /// Output column this target reads, if any.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Key => None,
            Self::Column(column) | Self::ColumnWithinOuterKey(column) => Some(column),
        }
    }
}

///
/// SortBy
///
/// Sort directive for summary rows. Sorting is stable; rows whose sort value
/// is undefined go last in either direction.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SortBy {
    pub target: SortTarget,
    pub direction: Direction,
}

impl SortBy {
    /// Sort by an output column, descending.
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            target: SortTarget::Column(name.into()),
            direction: Direction::Desc,
        }
    }

    /// Sort by an output column within each outer key, descending.
    pub fn column_within_outer_key(name: impl Into<String>) -> Self {
        Self {
            target: SortTarget::ColumnWithinOuterKey(name.into()),
            direction: Direction::Desc,
        }
    }

    /// Sort by the group key, ascending.
    #[must_use]
    pub const fn key() -> Self {
        Self {
            target: SortTarget::Key,
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub const fn ascending(mut self) -> Self {
        self.direction = Direction::Asc;
        self
    }

    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.direction = Direction::Desc;
        self
    }
}

///
/// AggregationRequest
///
/// One group key plus the aggregators evaluated per group, with an optional
/// sort directive and row limit applied to the produced summary.
///

#[derive(Clone, Debug, PartialEq)]
pub struct AggregationRequest {
    group_key: GroupKey,
    aggregators: Vec<Aggregator>,
    sort: Option<SortBy>,
    limit: Option<usize>,
}

impl AggregationRequest {
    /// Start a request grouped by `group_key`.
    pub fn by(group_key: impl Into<GroupKey>) -> Self {
        Self {
            group_key: group_key.into(),
            aggregators: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn aggregate(mut self, aggregator: Aggregator) -> Self {
        self.aggregators.push(aggregator);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Keep only the first `n` rows after sorting.
    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    #[must_use]
    pub const fn group_key(&self) -> &GroupKey {
        &self.group_key
    }

    #[must_use]
    pub fn aggregators(&self) -> &[Aggregator] {
        &self.aggregators
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&SortBy> {
        self.sort.as_ref()
    }

    /// Validate against `table`, then group and reduce its rows.
    pub fn apply(&self, table: &Table) -> Result<SummaryTable, Error> {
        let plan = self.plan(table)?;

        let groups = partition(table.raw_rows(), &plan.key_slots);
        let rows_by_index = table.raw_rows().collect::<Vec<_>>();
        let rows = groups
            .into_iter()
            .map(|group| {
                let values = self
                    .aggregators
                    .iter()
                    .zip(&plan.target_slots)
                    .map(|(aggregator, &slot)| {
                        let mut state = ReducerState::for_reduction(aggregator.reduction());
                        for &row in &group.rows {
                            state.update(&rows_by_index[row][slot]);
                        }
                        state.finish()
                    })
                    .collect();

                SummaryRow {
                    key: group.key,
                    values,
                }
            })
            .collect();

        let mut summary = SummaryTable::new(
            self.group_key.columns().to_vec(),
            plan.output_names,
            self.aggregators.iter().map(Aggregator::kind).collect(),
            rows,
        );
        if let Some(sort) = &self.sort {
            summary = summary.sort_by(sort)?;
        }
        if let Some(n) = self.limit {
            summary = summary.limit(n);
        }

        Ok(summary)
    }

    // Resolve every column reference before any row is touched.
    fn plan(&self, table: &Table) -> Result<RequestPlan, Error> {
        if self.group_key.is_empty() {
            return Err(Error::EmptyGroupKey);
        }
        if self.aggregators.is_empty() {
            return Err(Error::MissingAggregators);
        }

        let schema = table.schema();
        let key_slots = self.group_key.resolve(schema)?;

        let mut target_slots = Vec::with_capacity(self.aggregators.len());
        let mut output_names = Vec::with_capacity(self.aggregators.len());
        let mut seen = BTreeSet::new();
        for aggregator in &self.aggregators {
            target_slots.push(aggregator.resolve(schema)?);

            let name = aggregator.output_name();
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateOutput { name });
            }
            output_names.push(name);
        }

        if let Some(column) = self.sort.as_ref().and_then(|sort| sort.target.column()) {
            let Some(i) = output_names.iter().position(|n| n == column) else {
                return Err(Error::unknown_column(column));
            };
            let kind = self.aggregators[i].kind();
            if !kind.is_sortable() {
                return Err(Error::UnsortableColumn {
                    column: column.to_string(),
                    kind,
                });
            }
        }

        Ok(RequestPlan {
            key_slots,
            target_slots,
            output_names,
        })
    }
}

///
/// RequestPlan
///

struct RequestPlan {
    key_slots: Vec<usize>,
    target_slots: Vec<usize>,
    output_names: Vec<String>,
}

/// Group `table` by `group_key` and reduce each group with `aggregators`.
pub fn apply(
    table: &Table,
    group_key: impl Into<GroupKey>,
    aggregators: impl IntoIterator<Item = Aggregator>,
) -> Result<SummaryTable, Error> {
    aggregators
        .into_iter()
        .fold(AggregationRequest::by(group_key), AggregationRequest::aggregate)
        .apply(table)
}

///
/// TESTS
///

#[cfg(test)]
mod tests;
