mod property;

use crate::{
    aggregate::{AggregateKind, AggregateValue, Aggregator},
    error::Error,
    group::GroupKey,
    predicate::Predicate,
    request::{AggregationRequest, SortBy, apply},
    table::Table,
    test_support::{cat, season_schema, season_table, table_with_missing},
    value::Value,
};

#[test]
fn sums_amount_per_season() {
    let summary = apply(&season_table(), "Season", [Aggregator::sum("Amount")])
        .expect("request should succeed");

    assert_eq!(summary.key_columns(), ["Season"]);
    assert_eq!(summary.value_columns(), ["sum(Amount)"]);
    assert_eq!(
        summary.value(&[cat("Winter")], "sum(Amount)"),
        Ok(Some(&AggregateValue::Sum {
            total: 80.0,
            used: 2
        }))
    );
    assert_eq!(
        summary.value(&[cat("Summer")], "sum(Amount)"),
        Ok(Some(&AggregateValue::Sum {
            total: 20.0,
            used: 1
        }))
    );
}

#[test]
fn missing_values_group_separately_and_are_skipped_by_reducers() {
    let summary = AggregationRequest::by("Season")
        .aggregate(Aggregator::count("Amount"))
        .aggregate(Aggregator::mean("Amount"))
        .apply(&table_with_missing())
        .expect("request should succeed");

    let keys = summary
        .rows()
        .iter()
        .map(|row| row.key[0].clone())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec![cat("Winter"), Value::Null, cat("Summer")]);

    let winter = summary.get(&[cat("Winter")]).expect("Winter group");
    assert_eq!(winter.values[0], AggregateValue::Count(2));
    assert_eq!(
        winter.values[1],
        AggregateValue::Mean {
            mean: Some(10.0),
            used: 1
        }
    );
}

#[test]
fn groups_with_no_rows_are_not_emitted() {
    let summer = season_table()
        .filter(&Predicate::eq("Season", cat("Summer")))
        .expect("filter should succeed");
    let summary = apply(&summer, "Season", [Aggregator::count("Season")])
        .expect("request should succeed");

    assert_eq!(summary.len(), 1);
    assert!(summary.get(&[cat("Winter")]).is_none());
}

#[test]
fn empty_table_yields_empty_summary() {
    let table = Table::empty(season_schema());
    let summary =
        apply(&table, "Season", [Aggregator::sum("Amount")]).expect("request should succeed");

    assert!(summary.is_empty());
}

#[test]
fn unknown_aggregator_column_is_rejected() {
    let err = apply(&season_table(), "Season", [Aggregator::sum("Nonexistent")])
        .expect_err("unknown column must fail");

    assert_eq!(err, Error::unknown_column("Nonexistent"));
}

#[test]
fn out_of_range_quantile_is_rejected() {
    let err = apply(
        &season_table(),
        "Season",
        [Aggregator::quantile("Amount", 1.5)],
    )
    .expect_err("quantile outside [0, 1] must fail");

    assert_eq!(err, Error::InvalidQuantile { p: 1.5 });
}

#[test]
fn request_shape_is_validated_before_execution() {
    let table = season_table();

    assert_eq!(
        apply(
            &table,
            GroupKey::new(Vec::<String>::new()),
            [Aggregator::count("Season")]
        ),
        Err(Error::EmptyGroupKey)
    );
    assert_eq!(
        AggregationRequest::by("Season").apply(&table),
        Err(Error::MissingAggregators)
    );
    assert_eq!(
        apply(&table, "Region", [Aggregator::count("Season")]),
        Err(Error::unknown_column("Region"))
    );
    assert_eq!(
        apply(
            &table,
            "Season",
            [Aggregator::sum("Amount"), Aggregator::sum("Amount")]
        ),
        Err(Error::DuplicateOutput {
            name: "sum(Amount)".to_string()
        })
    );
}

#[test]
fn sort_column_must_exist_and_be_scalar() {
    let table = season_table();

    let err = AggregationRequest::by("Season")
        .aggregate(Aggregator::sum("Amount"))
        .sort_by(SortBy::column("total"))
        .apply(&table)
        .expect_err("unknown sort column must fail");
    assert_eq!(err, Error::unknown_column("total"));

    let err = AggregationRequest::by(["Season", "Category"])
        .aggregate(Aggregator::sum("Amount"))
        .sort_by(SortBy::column_within_outer_key("total"))
        .apply(&table)
        .expect_err("unknown sort column must fail");
    assert_eq!(err, Error::unknown_column("total"));

    let err = AggregationRequest::by("Season")
        .aggregate(Aggregator::top("Category"))
        .sort_by(SortBy::column("top_k(Category, 5)"))
        .apply(&table)
        .expect_err("top-k column cannot be sorted");
    assert!(matches!(
        err,
        Error::UnsortableColumn {
            kind: AggregateKind::TopK,
            ..
        }
    ));
}

#[test]
fn sorted_requests_are_stable_for_ties() {
    let summary = AggregationRequest::by("Category")
        .aggregate(Aggregator::count("Category"))
        .sort_by(SortBy::column("count(Category)").ascending())
        .apply(&table_with_missing())
        .expect("request should succeed");

    let keys = summary
        .rows()
        .iter()
        .map(|row| row.key[0].clone())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec![Value::Null, cat("Clothing"), cat("Shoes")]);
}
