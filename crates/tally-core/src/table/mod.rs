//! Immutable, row-oriented, typed tables.
//!
//! A `Table` is validated once at load time and never mutated afterwards;
//! every transforming operation (`filter`, `bin`) returns a new table.

mod bin;
mod describe;
mod schema;


use crate::{
    error::Error,
    obs::sink::{MetricsEvent, record},
    predicate::Predicate,
    value::Value,
};
use derive_more::Deref;
use std::collections::BTreeMap;

// re-exports
pub use describe::{ColumnStats, Description};
pub use schema::{ColumnDef, ColumnType, Schema};

///
/// Row
///
/// Schema-ordered cell values for one row.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct Row(Vec<Value>);

///
/// RowRef
///
/// Borrowed row paired with its schema so cells can be read by name.
///

#[derive(Clone, Copy, Debug)]
pub struct RowRef<'a> {
    schema: &'a Schema,
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    /// Cell value for `column`, or `None` when the schema has no such column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.schema.index_of(column).map(|i| &self.values[i])
    }

    #[must_use]
    pub const fn values(&self) -> &'a [Value] {
        self.values
    }
}

///
/// Column
///
/// Borrowed view over one column's cells in row order.
///

#[derive(Clone, Debug)]
pub struct Column<'a> {
    def: &'a ColumnDef,
    values: Vec<&'a Value>,
}

impl<'a> Column<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.def.name
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.def.ty
    }

    #[must_use]
    pub fn values(&self) -> &[&'a Value] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Non-missing numeric cells in row order.
    #[must_use]
    pub fn numeric(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.as_f64()).collect()
    }
}

///
/// Table
///

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Validate name-keyed rows against `schema` and build a table.
    ///
    /// Every row must carry exactly the schema's columns and every value must
    /// match its declared column type (`Null` is accepted everywhere).
    pub fn load<I>(rows: I, schema: Schema) -> Result<Self, Error>
    where
        I: IntoIterator<Item = BTreeMap<String, Value>>,
    {
        let mut loaded = Vec::new();
        for (row_index, mut cells) in rows.into_iter().enumerate() {
            let missing = schema
                .names()
                .filter(|name| !cells.contains_key(*name))
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            let unexpected = cells
                .keys()
                .filter(|name| schema.index_of(name).is_none())
                .cloned()
                .collect::<Vec<_>>();
            if !missing.is_empty() || !unexpected.is_empty() {
                return Err(Error::SchemaMismatch {
                    row: row_index,
                    missing,
                    unexpected,
                });
            }

            let mut values = Vec::with_capacity(schema.len());
            for def in schema.columns() {
                let value = cells.remove(&def.name).unwrap_or(Value::Null);
                if !def.ty.accepts(&value) {
                    return Err(Error::TypeMismatch {
                        row: row_index,
                        column: def.name.clone(),
                        expected: def.ty,
                        found: value.kind(),
                    });
                }
                values.push(value);
            }
            loaded.push(Row(values));
        }

        Ok(Self {
            schema,
            rows: loaded,
        })
    }

    /// Build a table with no rows.
    #[must_use]
    pub const fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(|row| RowRef {
            schema: &self.schema,
            values: row,
        })
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|row| RowRef {
            schema: &self.schema,
            values: row,
        })
    }

    /// Single cell lookup by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Result<Option<&Value>, Error> {
        let (slot, _) = self.schema.resolve(column)?;

        Ok(self.rows.get(row).map(|r| &r[slot]))
    }

    /// All cells of one column in row order.
    pub fn column(&self, name: &str) -> Result<Column<'_>, Error> {
        let (slot, def) = self.schema.resolve(name)?;

        Ok(Column {
            def,
            values: self.rows.iter().map(|row| &row[slot]).collect(),
        })
    }

    /// Rows matching `predicate`, as a new table.
    pub fn filter(&self, predicate: &Predicate) -> Result<Self, Error> {
        let compiled = predicate.compile(&self.schema)?;

        Ok(self.retain(|row| compiled.eval(row)))
    }

    /// Rows for which `keep` returns true, as a new table.
    #[must_use]
    pub fn filter_rows(&self, mut keep: impl FnMut(RowRef<'_>) -> bool) -> Self {
        self.retain(|values| {
            keep(RowRef {
                schema: &self.schema,
                values,
            })
        })
    }

    /// Missing-value count per column, in schema order.
    #[must_use]
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.schema
            .columns()
            .iter()
            .enumerate()
            .map(|(slot, def)| {
                let nulls = self.rows.iter().filter(|row| row[slot].is_null()).count();
                (def.name.clone(), nulls)
            })
            .collect()
    }

    // Row values by slot; used by grouping and reducers.
    pub(crate) fn raw_rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    fn retain(&self, mut keep: impl FnMut(&[Value]) -> bool) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row))
            .cloned()
            .collect::<Vec<_>>();

        record(MetricsEvent::TableFiltered {
            rows_in: self.rows.len() as u64,
            rows_out: rows.len() as u64,
        });

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }
}
