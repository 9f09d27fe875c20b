use crate::{aggregate::AggregateValue, value::Value};
use serde::Serialize;

///
/// Matrix
///
/// Two-level summary reshaped to rows by columns. A cell is `None` when the
/// key combination had no rows. Labels keep first-seen order.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Matrix {
    pub row_key: String,
    pub column_key: String,
    pub value_column: String,
    pub row_labels: Vec<Value>,
    pub column_labels: Vec<Value>,
    pub cells: Vec<Vec<Option<AggregateValue>>>,
}

impl Matrix {
    pub(super) fn build<'a>(
        row_key: &str,
        column_key: &str,
        value_column: &str,
        entries: impl Iterator<Item = (&'a Value, &'a Value, &'a AggregateValue)>,
    ) -> Self {
        let mut row_labels = Vec::<Value>::new();
        let mut column_labels = Vec::<Value>::new();
        let mut placed = Vec::new();

        for (r, c, value) in entries {
            let ri = position_or_push(&mut row_labels, r);
            let ci = position_or_push(&mut column_labels, c);
            placed.push((ri, ci, value.clone()));
        }

        let mut cells = vec![vec![None; column_labels.len()]; row_labels.len()];
        for (ri, ci, value) in placed {
            cells[ri][ci] = Some(value);
        }

        Self {
            row_key: row_key.to_string(),
            column_key: column_key.to_string(),
            value_column: value_column.to_string(),
            row_labels,
            column_labels,
            cells,
        }
    }

    /// Cell at (`row`, `column`) labels; `None` for unknown labels or empty
    /// combinations.
    #[must_use]
    pub fn cell(&self, row: &Value, column: &Value) -> Option<&AggregateValue> {
        let ri = self.row_labels.iter().position(|l| l == row)?;
        let ci = self.column_labels.iter().position(|l| l == column)?;

        self.cells[ri][ci].as_ref()
    }
}

fn position_or_push(labels: &mut Vec<Value>, label: &Value) -> usize {
    labels.iter().position(|l| l == label).unwrap_or_else(|| {
        labels.push(label.clone());
        labels.len() - 1
    })
}
