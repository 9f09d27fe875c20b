use crate::{
    aggregate::{AggregateValue, Aggregator},
    request::{AggregationRequest, SortBy},
    summary::SummaryTable,
    table::{ColumnDef, ColumnType, Schema, Table},
    value::Value,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_table() -> impl Strategy<Value = Table> {
    let row = (
        prop_oneof![Just("Winter"), Just("Spring"), Just("Summer"), Just("Fall")],
        prop::option::of(0i64..200),
    );

    prop::collection::vec(row, 0..40).prop_map(|rows| {
        let schema = Schema::new(vec![
            ColumnDef::new("Season", ColumnType::Category),
            ColumnDef::new("Amount", ColumnType::Int),
        ])
        .expect("schema should be valid");
        let rows = rows.into_iter().map(|(season, amount)| {
            BTreeMap::from([
                ("Season".to_string(), Value::category(season)),
                ("Amount".to_string(), Value::from(amount)),
            ])
        });

        Table::load(rows, schema).expect("generated rows should load")
    })
}

fn scalar(value: &AggregateValue) -> Option<f64> {
    value.as_f64()
}

proptest! {
    #[test]
    fn group_counts_cover_every_row(table in arb_table()) {
        let summary = AggregationRequest::by("Season")
            .aggregate(Aggregator::count("Amount"))
            .apply(&table)
            .expect("request should succeed");

        let total = summary
            .rows()
            .iter()
            .filter_map(|row| scalar(&row.values[0]))
            .sum::<f64>();
        prop_assert!((total - table.len() as f64).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_is_sum_over_used(table in arb_table()) {
        let summary = AggregationRequest::by("Season")
            .aggregate(Aggregator::sum("Amount"))
            .aggregate(Aggregator::mean("Amount"))
            .apply(&table)
            .expect("request should succeed");

        for row in summary.rows() {
            let AggregateValue::Sum { total, used } = row.values[0] else {
                return Err(TestCaseError::fail("sum output expected"));
            };
            let AggregateValue::Mean { mean, used: mean_used } = row.values[1] else {
                return Err(TestCaseError::fail("mean output expected"));
            };

            prop_assert_eq!(used, mean_used);
            match mean {
                Some(mean) => {
                    prop_assert!((mean - total / used as f64).abs() < 1e-9);
                }
                None => {
                    prop_assert_eq!(used, 0);
                }
            }
        }
    }

    #[test]
    fn median_of_odd_length_is_middle_element(
        mut values in prop::collection::vec(-1000i64..1000, 0..20),
    ) {
        if values.len() % 2 == 0 {
            values.push(0);
        }
        let schema = Schema::new(vec![
            ColumnDef::new("Key", ColumnType::Int),
            ColumnDef::new("Amount", ColumnType::Int),
        ])
        .expect("schema should be valid");
        let rows = values.iter().map(|&amount| {
            BTreeMap::from([
                ("Key".to_string(), Value::Int(0)),
                ("Amount".to_string(), Value::Int(amount)),
            ])
        });
        let table = Table::load(rows, schema).expect("rows should load");

        let summary = AggregationRequest::by("Key")
            .aggregate(Aggregator::quantile("Amount", 0.5))
            .apply(&table)
            .expect("request should succeed");

        values.sort_unstable();
        let middle = values[values.len() / 2] as f64;
        prop_assert_eq!(
            summary.rows()[0].values[0].clone(),
            AggregateValue::Quantile(Some(middle))
        );
    }

    #[test]
    fn descending_then_ascending_reverses_distinct_values(table in arb_table()) {
        let summary = AggregationRequest::by("Season")
            .aggregate(Aggregator::sum("Amount"))
            .apply(&table)
            .expect("request should succeed");

        let desc = summary
            .clone()
            .sort_by(&SortBy::column("sum(Amount)"))
            .expect("sortable column");
        let asc = summary
            .sort_by(&SortBy::column("sum(Amount)").ascending())
            .expect("sortable column");

        let column_values = |s: &SummaryTable| {
            s.rows()
                .iter()
                .filter_map(|r| scalar(&r.values[0]))
                .collect::<Vec<_>>()
        };
        let mut desc_values = column_values(&desc);
        let asc_values = column_values(&asc);
        desc_values.reverse();
        prop_assert_eq!(desc_values, asc_values);
    }
}
