//! Row partitioning by group key.
//!
//! Groups are formed from existing rows only and listed in the order their
//! first row appears. Missing cells are ordinary key values, so rows with a
//! missing key cell form their own group.

use crate::{error::Error, table::Schema, value::Value};
use derive_more::Deref;
use std::collections::BTreeMap;

///
/// GroupKey
///
/// Ordered, non-empty list of column names to group by.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct GroupKey {
    columns: Vec<String>,
}

impl GroupKey {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-column key.
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            columns: vec![name.into()],
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Resolve key columns to schema slots.
    pub(crate) fn resolve(&self, schema: &Schema) -> Result<Vec<usize>, Error> {
        if self.columns.is_empty() {
            return Err(Error::EmptyGroupKey);
        }

        self.columns
            .iter()
            .map(|name| schema.resolve(name).map(|(slot, _)| slot))
            .collect()
    }
}

impl From<&str> for GroupKey {
    fn from(column: &str) -> Self {
        Self::column(column)
    }
}

impl From<String> for GroupKey {
    fn from(column: String) -> Self {
        Self::column(column)
    }
}

impl<const N: usize> From<[&str; N]> for GroupKey {
    fn from(columns: [&str; N]) -> Self {
        Self::new(columns)
    }
}

///
/// Group
///
/// One partition: its key tuple and member row indices in table order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Group {
    pub(crate) key: Vec<Value>,
    pub(crate) rows: Vec<usize>,
}

/// Partition `rows` by the values at `slots`, in first-seen group order.
pub(crate) fn partition<'a>(
    rows: impl IntoIterator<Item = &'a [Value]>,
    slots: &[usize],
) -> Vec<Group> {
    let mut index = BTreeMap::<Vec<Value>, usize>::new();
    let mut groups = Vec::<Group>::new();

    for (row_index, row) in rows.into_iter().enumerate() {
        let key = slots.iter().map(|&slot| row[slot].clone()).collect::<Vec<_>>();
        if let Some(&g) = index.get(&key) {
            groups[g].rows.push(row_index);
        } else {
            index.insert(key.clone(), groups.len());
            groups.push(Group {
                key,
                rows: vec![row_index],
            });
        }
    }

    groups
}

///
/// TESTS
///
