//! Declarative row filters.
//!
//! A `Predicate` names columns; `compile` resolves those names against one
//! schema so evaluation is a slot lookup per row.

use crate::{
    error::Error,
    table::{ColumnDef, ColumnType, Schema},
    value::{Value, predicate_cmp},
};
use std::cmp::Ordering;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    // Missing cells never satisfy an ordering comparison; `Ne` treats them as
    // different from any present value.
    fn matches(self, ord: Option<Ordering>) -> bool {
        match (self, ord) {
            (Self::Ne, None) => true,
            (_, None) => false,
            (Self::Eq, Some(o)) => o == Ordering::Equal,
            (Self::Ne, Some(o)) => o != Ordering::Equal,
            (Self::Lt, Some(o)) => o == Ordering::Less,
            (Self::Le, Some(o)) => o != Ordering::Greater,
            (Self::Gt, Some(o)) => o == Ordering::Greater,
            (Self::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    IsNull {
        column: String,
    },
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

impl Predicate {
    fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Le, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Ge, value)
    }

    /// Membership test (`isin`).
    pub fn is_in<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
        }
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut children) => {
                children.push(other);
                Self::And(children)
            }
            this => Self::And(vec![this, other]),
        }
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut children) => {
                children.push(other);
                Self::Or(children)
            }
            this => Self::Or(vec![this, other]),
        }
    }

    #[must_use]
    #[expect(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Resolve every column name against `schema` and check each literal
    /// against its column's type.
    pub(crate) fn compile(&self, schema: &Schema) -> Result<CompiledPredicate, Error> {
        let compiled = match self {
            Self::Compare { column, op, value } => {
                let (slot, def) = schema.resolve(column)?;
                CompiledPredicate::Compare {
                    slot,
                    op: *op,
                    value: coerce_literal(def, value)?,
                }
            }
            Self::In { column, values } => {
                let (slot, def) = schema.resolve(column)?;
                CompiledPredicate::In {
                    slot,
                    values: values
                        .iter()
                        .map(|v| coerce_literal(def, v))
                        .collect::<Result<_, _>>()?,
                }
            }
            Self::IsNull { column } => CompiledPredicate::IsNull {
                slot: schema.resolve(column)?.0,
            },
            Self::And(children) => CompiledPredicate::And(compile_all(children, schema)?),
            Self::Or(children) => CompiledPredicate::Or(compile_all(children, schema)?),
            Self::Not(inner) => CompiledPredicate::Not(Box::new(inner.compile(schema)?)),
        };

        Ok(compiled)
    }
}

// Text and Category literals convert into each other; Int and Float mix
// freely on numeric columns. Any other kind mismatch is rejected.
fn coerce_literal(def: &ColumnDef, value: &Value) -> Result<Value, Error> {
    let coerced = match (def.ty, value) {
        (ColumnType::Category, Value::Text(s)) => Value::Category(s.clone()),
        (ColumnType::Text, Value::Category(s)) => Value::Text(s.clone()),
        (ty, v) if ty.accepts(v) || (ty.is_numeric() && v.is_numeric()) => v.clone(),
        (ty, v) => {
            return Err(Error::LiteralMismatch {
                column: def.name.clone(),
                expected: ty,
                found: v.kind(),
            });
        }
    };

    Ok(coerced)
}

fn compile_all(children: &[Predicate], schema: &Schema) -> Result<Vec<CompiledPredicate>, Error> {
    children.iter().map(|c| c.compile(schema)).collect()
}

///
/// CompiledPredicate
/// slot-resolved predicate program
///

#[derive(Clone, Debug)]
pub(crate) enum CompiledPredicate {
    Compare {
        slot: usize,
        op: CompareOp,
        value: Value,
    },
    In {
        slot: usize,
        values: Vec<Value>,
    },
    IsNull {
        slot: usize,
    },
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

impl CompiledPredicate {
    pub(crate) fn eval(&self, row: &[Value]) -> bool {
        match self {
            Self::Compare { slot, op, value } => op.matches(predicate_cmp(&row[*slot], value)),
            Self::In { slot, values } => {
                let cell = &row[*slot];
                values
                    .iter()
                    .any(|v| predicate_cmp(cell, v) == Some(Ordering::Equal))
            }
            Self::IsNull { slot } => row[*slot].is_null(),
            Self::And(children) => children.iter().all(|c| c.eval(row)),
            Self::Or(children) => children.iter().any(|c| c.eval(row)),
            Self::Not(inner) => !inner.eval(row),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::season_table;

    fn seasons(pred: &Predicate) -> Vec<String> {
        season_table()
            .filter(pred)
            .expect("filter should succeed")
            .column("Season")
            .expect("Season column")
            .values()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn compare_filters_numeric_cells() {
        assert_eq!(
            seasons(&Predicate::gt("Amount", 25)),
            vec!["Winter", "Winter"]
        );
        assert_eq!(seasons(&Predicate::le("Amount", 20.0)), vec!["Summer"]);
    }

    #[test]
    fn membership_and_boolean_combinators() {
        let pred = Predicate::is_in("Category", [Value::category("Shoes")])
            .or(Predicate::eq("Amount", 50));
        assert_eq!(seasons(&pred), vec!["Winter", "Summer"]);

        let pred =
            Predicate::eq("Season", Value::category("Winter")).and(Predicate::lt("Amount", 40));
        assert_eq!(seasons(&pred), vec!["Winter"]);

        let pred = Predicate::eq("Season", Value::category("Winter")).not();
        assert_eq!(seasons(&pred), vec!["Summer"]);
    }

    #[test]
    fn missing_cells_fail_ordering_comparisons() {
        let table = crate::test_support::table_with_missing();

        let over = table
            .filter(&Predicate::gt("Amount", 0))
            .expect("filter should succeed");
        let nulls = table
            .filter(&Predicate::is_null("Amount"))
            .expect("filter should succeed");
        let not_ten = table
            .filter(&Predicate::ne("Amount", 10))
            .expect("filter should succeed");

        assert_eq!(over.len() + nulls.len(), table.len());
        assert_eq!(not_ten.len(), table.len() - 1);
    }

    #[test]
    fn unknown_column_is_rejected_before_evaluation() {
        let err = season_table()
            .filter(&Predicate::eq("Preferred Payment Method", "PayPal"))
            .expect_err("unknown column must fail");

        assert!(matches!(
            err,
            Error::UnknownColumn { column } if column == "Preferred Payment Method"
        ));
    }

    #[test]
    fn text_literals_match_category_cells() {
        assert_eq!(
            seasons(&Predicate::eq("Season", "Winter")),
            vec!["Winter", "Winter"]
        );
        assert_eq!(seasons(&Predicate::ne("Season", "Winter")), vec!["Summer"]);
        assert_eq!(
            seasons(&Predicate::is_in("Category", ["Shoes"])),
            vec!["Summer"]
        );
    }

    #[test]
    fn mismatched_literal_kind_is_rejected() {
        let err = season_table()
            .filter(&Predicate::eq("Amount", "50"))
            .expect_err("text literal on an Int column must fail");

        assert_eq!(
            err,
            Error::LiteralMismatch {
                column: "Amount".to_string(),
                expected: ColumnType::Int,
                found: crate::value::ValueKind::Text,
            }
        );
        assert!(
            season_table()
                .filter(&Predicate::is_in("Season", [Value::Int(1)]).not())
                .is_err()
        );
    }
}
