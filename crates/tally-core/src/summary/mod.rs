//! Module: summary
//! Responsibility: grouped results and the operations callers run over them.
//! Does not own: reduction of table rows (see `request`).

mod matrix;


use crate::{
    aggregate::{AggregateKind, AggregateValue, quantile_linear, validate_quantile},
    error::Error,
    request::{Direction, SortBy, SortTarget},
    value::Value,
};
use serde::Serialize;
use std::cmp::Ordering;

// re-exports
pub use matrix::Matrix;

///
/// SummaryRow
///
/// One group: its key tuple and one aggregate value per output column.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: Vec<Value>,
    pub values: Vec<AggregateValue>,
}

///
/// SummaryTable
///
/// Ordered, key-unique result of one aggregation request.
/// Rows are in first-seen group order until a sort is applied.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryTable {
    key_columns: Vec<String>,
    value_columns: Vec<String>,
    #[serde(skip)]
    value_kinds: Vec<AggregateKind>,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub(crate) const fn new(
        key_columns: Vec<String>,
        value_columns: Vec<String>,
        value_kinds: Vec<AggregateKind>,
        rows: Vec<SummaryRow>,
    ) -> Self {
        Self {
            key_columns,
            value_columns,
            value_kinds,
            rows,
        }
    }

    #[must_use]
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    #[must_use]
    pub fn value_columns(&self) -> &[String] {
        &self.value_columns
    }

    #[must_use]
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row whose key equals `key`.
    #[must_use]
    pub fn get(&self, key: &[Value]) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// One output cell, addressed by key and output column.
    pub fn value(&self, key: &[Value], column: &str) -> Result<Option<&AggregateValue>, Error> {
        let slot = self.column_slot(column)?;

        Ok(self.get(key).map(|row| &row.values[slot]))
    }

    /// All values of one output column in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&AggregateValue>, Error> {
        let slot = self.column_slot(name)?;

        Ok(self.rows.iter().map(|row| &row.values[slot]).collect())
    }

    /// Re-sort rows. Stable; undefined sort values go last in either direction.
    pub fn sort_by(mut self, sort: &SortBy) -> Result<Self, Error> {
        let desc = sort.direction == Direction::Desc;
        let directed = |ord: Ordering| if desc { ord.reverse() } else { ord };

        match &sort.target {
            SortTarget::Key => {
                self.rows.sort_by(|a, b| directed(a.key.cmp(&b.key)));
            }
            SortTarget::Column(column) => {
                let slot = self.scalar_slot(column)?;
                self.rows
                    .sort_by(|a, b| cmp_scalar(&a.values[slot], &b.values[slot], directed));
            }
            SortTarget::ColumnWithinOuterKey(column) => {
                let slot = self.scalar_slot(column)?;
                let outer = self.key_columns.len().saturating_sub(1);
                self.rows.sort_by(|a, b| {
                    a.key[..outer].cmp(&b.key[..outer]).then_with(|| {
                        cmp_scalar(&a.values[slot], &b.values[slot], directed)
                    })
                });
            }
        }

        Ok(self)
    }

    /// Keep the first `n` rows.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Linear quantile over the defined scalar values of one output column.
    pub fn quantile(&self, column: &str, p: f64) -> Result<Option<f64>, Error> {
        validate_quantile(p)?;
        let values = self.scalars(column)?;

        Ok(quantile_linear(&values, p))
    }

    /// Single-level keys whose scalar value in `column` satisfies `keep`.
    pub fn keys_where(
        &self,
        column: &str,
        keep: impl Fn(f64) -> bool,
    ) -> Result<Vec<Value>, Error> {
        self.require_levels("keys_where", 1)?;
        let slot = self.scalar_slot(column)?;

        Ok(self
            .rows
            .iter()
            .filter(|row| row.values[slot].as_f64().is_some_and(&keep))
            .map(|row| row.key[0].clone())
            .collect())
    }

    /// Append a `Share` column holding each row's percentage of the column total.
    ///
    /// Undefined values contribute nothing and receive a share of zero, as does
    /// every row when the total is zero.
    pub fn with_share(mut self, column: &str, output: impl Into<String>) -> Result<Self, Error> {
        let output = output.into();
        if self.value_columns.contains(&output) {
            return Err(Error::DuplicateOutput { name: output });
        }

        let slot = self.scalar_slot(column)?;
        let total: f64 = self
            .rows
            .iter()
            .filter_map(|row| row.values[slot].as_f64())
            .sum();

        for row in &mut self.rows {
            let share = match row.values[slot].as_f64() {
                Some(x) if total != 0.0 => x / total * 100.0,
                _ => 0.0,
            };
            row.values.push(AggregateValue::Share(share));
        }
        self.value_columns.push(output);
        self.value_kinds.push(AggregateKind::Share);

        Ok(self)
    }

    /// Reshape a two-level summary into rows (first level) by columns
    /// (second level).
    pub fn to_matrix(&self, column: &str) -> Result<Matrix, Error> {
        self.require_levels("to_matrix", 2)?;
        let slot = self.column_slot(column)?;

        Ok(Matrix::build(
            &self.key_columns[0],
            &self.key_columns[1],
            column,
            self.rows
                .iter()
                .map(|row| (&row.key[0], &row.key[1], &row.values[slot])),
        ))
    }

    fn column_slot(&self, name: &str) -> Result<usize, Error> {
        self.value_columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::unknown_column(name))
    }

    // Slot of a column whose values have a scalar order.
    fn scalar_slot(&self, name: &str) -> Result<usize, Error> {
        let slot = self.column_slot(name)?;
        let kind = self.value_kinds[slot];
        if !kind.is_sortable() {
            return Err(Error::UnsortableColumn {
                column: name.to_string(),
                kind,
            });
        }

        Ok(slot)
    }

    fn scalars(&self, column: &str) -> Result<Vec<f64>, Error> {
        let slot = self.scalar_slot(column)?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.values[slot].as_f64())
            .collect())
    }

    const fn require_levels(&self, operation: &'static str, expected: usize) -> Result<(), Error> {
        let found = self.key_columns.len();
        if found != expected {
            return Err(Error::KeyArity {
                operation,
                expected,
                found,
            });
        }

        Ok(())
    }
}

// Min/max order by their value; everything else by the scalar view.
// Undefined values go last regardless of direction.
fn cmp_scalar(
    a: &AggregateValue,
    b: &AggregateValue,
    directed: impl Fn(Ordering) -> Ordering,
) -> Ordering {
    match (is_undefined(a), is_undefined(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => directed(compare_defined(a, b)),
    }
}

fn compare_defined(a: &AggregateValue, b: &AggregateValue) -> Ordering {
    match (a, b) {
        (AggregateValue::Min(x), AggregateValue::Min(y))
        | (AggregateValue::Max(x), AggregateValue::Max(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

const fn is_undefined(value: &AggregateValue) -> bool {
    match value {
        AggregateValue::Min(v) | AggregateValue::Max(v) => v.is_null(),
        _ => value.as_f64().is_none(),
    }
}
