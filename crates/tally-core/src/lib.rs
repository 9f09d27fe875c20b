//! Core runtime for Tally: typed values, immutable tables, grouping,
//! aggregate reducers, summary tables, and the request pipeline.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregate;
pub mod config;
pub mod error;
pub mod group;
pub mod obs;
pub mod pipeline;
pub mod predicate;
pub mod request;
pub mod summary;
pub mod table;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default number of entries kept by a top-k frequency reducer when the
/// caller asks for "value counts" without an explicit bound.
pub const DEFAULT_TOP_K: usize = 5;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No metrics plumbing or config parsing is re-exported here.
///

pub mod prelude {
    pub use crate::{
        aggregate::{AggregateKind, AggregateValue, Aggregator, Frequency},
        error::Error,
        group::GroupKey,
        pipeline::{Pipeline, PipelineOutput},
        predicate::Predicate,
        request::{AggregationRequest, Direction, SortBy},
        summary::{Matrix, SummaryRow, SummaryTable},
        table::{ColumnDef, ColumnType, Schema, Table},
        value::Value,
    };
}
