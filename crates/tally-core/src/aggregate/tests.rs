use crate::{
    aggregate::{AggregateKind, AggregateValue, Aggregator, Frequency, ReducerState, Reduction},
    error::Error,
    test_support::{cat, season_schema},
    value::Value,
};

fn reduce(reduction: Reduction, cells: &[Value]) -> AggregateValue {
    let mut state = ReducerState::for_reduction(reduction);
    for cell in cells {
        state.update(cell);
    }

    state.finish()
}

#[test]
fn output_names_default_to_kind_and_column() {
    assert_eq!(Aggregator::sum("Amount").output_name(), "sum(Amount)");
    assert_eq!(Aggregator::count("Amount").output_name(), "count(Amount)");
    assert_eq!(
        Aggregator::quantile("Amount", 0.8).output_name(),
        "quantile(Amount, 0.8)"
    );
    assert_eq!(
        Aggregator::sum("Amount").alias("total_spending").output_name(),
        "total_spending"
    );
}

#[test]
fn top_uses_the_default_bound() {
    assert_eq!(
        Aggregator::top("Category").reduction(),
        Reduction::TopK(crate::DEFAULT_TOP_K)
    );
}

#[test]
fn resolve_validates_column_and_parameters() {
    let schema = season_schema();

    assert_eq!(Aggregator::sum("Amount").resolve(&schema), Ok(2));
    assert_eq!(Aggregator::max("Season").resolve(&schema), Ok(0));

    let err = Aggregator::sum("Nonexistent")
        .resolve(&schema)
        .expect_err("unknown column must fail");
    assert!(matches!(err, Error::UnknownColumn { column } if column == "Nonexistent"));

    let err = Aggregator::mean("Season")
        .resolve(&schema)
        .expect_err("mean over a category must fail");
    assert!(matches!(err, Error::IncompatibleColumn { operation: "mean", .. }));

    let err = Aggregator::quantile("Amount", 1.5)
        .resolve(&schema)
        .expect_err("quantile outside [0, 1] must fail");
    assert!(matches!(err, Error::InvalidQuantile { .. }));

    let err = Aggregator::top_k("Season", 0)
        .resolve(&schema)
        .expect_err("top-0 must fail");
    assert!(matches!(err, Error::InvalidTopK { .. }));
}

#[test]
fn sum_and_mean_skip_missing_cells() {
    let cells = [Value::Int(10), Value::Null, Value::Int(5)];

    assert_eq!(
        reduce(Reduction::Sum, &cells),
        AggregateValue::Sum {
            total: 15.0,
            used: 2
        }
    );
    assert_eq!(
        reduce(Reduction::Mean, &cells),
        AggregateValue::Mean {
            mean: Some(7.5),
            used: 2
        }
    );
}

#[test]
fn empty_numeric_reductions_are_zero_or_undefined() {
    let cells = [Value::Null, Value::Null];

    assert_eq!(
        reduce(Reduction::Sum, &cells),
        AggregateValue::Sum {
            total: 0.0,
            used: 0
        }
    );
    assert_eq!(
        reduce(Reduction::Mean, &cells),
        AggregateValue::Mean { mean: None, used: 0 }
    );
    assert_eq!(
        reduce(Reduction::Quantile(0.5), &cells),
        AggregateValue::Quantile(None)
    );
    assert_eq!(reduce(Reduction::Min, &cells), AggregateValue::Min(Value::Null));
}

#[test]
fn count_includes_missing_cells_and_distinct_count_does_not() {
    let cells = [cat("Blue"), Value::Null, cat("Blue"), cat("Red")];

    assert_eq!(reduce(Reduction::Count, &cells), AggregateValue::Count(4));
    assert_eq!(
        reduce(Reduction::DistinctCount, &cells),
        AggregateValue::DistinctCount(2)
    );
}

#[test]
fn min_and_max_follow_canonical_order() {
    let cells = [Value::Int(7), Value::Null, Value::Int(-3), Value::Int(12)];

    assert_eq!(reduce(Reduction::Min, &cells), AggregateValue::Min(Value::Int(-3)));
    assert_eq!(reduce(Reduction::Max, &cells), AggregateValue::Max(Value::Int(12)));
}

#[test]
fn top_k_breaks_ties_by_first_seen_order() {
    let cells = [
        cat("Green"),
        cat("Blue"),
        Value::Null,
        cat("Blue"),
        cat("Red"),
        cat("Green"),
        Value::Null,
        cat("Red"),
    ];

    let AggregateValue::TopK(top) = reduce(Reduction::TopK(2), &cells) else {
        panic!("top-k reduction should produce TopK");
    };

    assert_eq!(
        top,
        vec![
            Frequency {
                value: cat("Green"),
                count: 2
            },
            Frequency {
                value: cat("Blue"),
                count: 2
            },
        ]
    );
}

#[test]
fn scalar_view_covers_everything_but_top_k() {
    assert_eq!(AggregateValue::Count(3).as_f64(), Some(3.0));
    assert_eq!(AggregateValue::Max(Value::Int(9)).as_f64(), Some(9.0));
    assert_eq!(AggregateValue::Min(cat("Blue")).as_f64(), None);
    assert_eq!(AggregateValue::TopK(Vec::new()).as_f64(), None);
    assert_eq!(AggregateValue::TopK(Vec::new()).kind(), AggregateKind::TopK);
    assert!(!AggregateKind::TopK.is_sortable());
}
