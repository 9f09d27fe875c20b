use crate::{
    table::{ColumnDef, ColumnType, Schema, Table},
    value::Value,
};
use std::collections::BTreeMap;

pub(crate) fn season_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("Season", ColumnType::Category),
        ColumnDef::new("Category", ColumnType::Category),
        ColumnDef::new("Amount", ColumnType::Int),
    ])
    .expect("season schema should be valid")
}

pub(crate) fn season_row(season: Value, category: Value, amount: Value) -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("Season".to_string(), season),
        ("Category".to_string(), category),
        ("Amount".to_string(), amount),
    ])
}

pub(crate) fn cat(label: &str) -> Value {
    Value::category(label)
}

/// Three-row table: Winter/Clothing/50, Winter/Clothing/30, Summer/Shoes/20.
pub(crate) fn season_table() -> Table {
    Table::load(
        vec![
            season_row(cat("Winter"), cat("Clothing"), Value::Int(50)),
            season_row(cat("Winter"), cat("Clothing"), Value::Int(30)),
            season_row(cat("Summer"), cat("Shoes"), Value::Int(20)),
        ],
        season_schema(),
    )
    .expect("season table should load")
}

/// Table with missing cells in every column.
pub(crate) fn table_with_missing() -> Table {
    Table::load(
        vec![
            season_row(cat("Winter"), cat("Clothing"), Value::Int(10)),
            season_row(cat("Winter"), Value::Null, Value::Null),
            season_row(Value::Null, cat("Shoes"), Value::Int(5)),
            season_row(cat("Summer"), cat("Shoes"), Value::Null),
            season_row(cat("Summer"), cat("Clothing"), Value::Int(7)),
        ],
        season_schema(),
    )
    .expect("table with missing cells should load")
}
