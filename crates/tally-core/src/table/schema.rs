use crate::{
    error::Error,
    value::{Value, ValueKind},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

///
/// ColumnType
///
/// Declared type of one table column.
/// `Null` cells are accepted by every column type.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ColumnType {
    Bool,
    Category,
    Float,
    Int,
    Text,
}

impl ColumnType {
    /// Returns true for column types accepted by numeric reductions.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns true when `value` may be stored in a column of this type.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value.kind()),
            (_, ValueKind::Null)
                | (Self::Bool, ValueKind::Bool)
                | (Self::Category, ValueKind::Category)
                | (Self::Float, ValueKind::Float)
                | (Self::Int, ValueKind::Int)
                | (Self::Text, ValueKind::Text)
        )
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Category => "Category",
            Self::Float => "Float",
            Self::Int => "Int",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// ColumnDef
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

///
/// Schema
///
/// Ordered, duplicate-free column list shared by every row of a table.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, Error> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self { columns })
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Resolve a column name into its slot and definition.
    pub fn resolve(&self, name: &str) -> Result<(usize, &ColumnDef), Error> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Resolve a column that must be numeric for `operation`.
    pub(crate) fn resolve_numeric(
        &self,
        name: &str,
        operation: &'static str,
    ) -> Result<usize, Error> {
        let (index, def) = self.resolve(name)?;
        if !def.ty.is_numeric() {
            return Err(Error::IncompatibleColumn {
                column: def.name.clone(),
                column_type: def.ty,
                operation,
            });
        }

        Ok(index)
    }

    /// Return a copy of this schema with one more column appended.
    pub(crate) fn with_column(&self, column: ColumnDef) -> Result<Self, Error> {
        let mut columns = self.columns.clone();
        columns.push(column);

        Self::new(columns)
    }
}
