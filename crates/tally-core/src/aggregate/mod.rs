//! Module: aggregate
//! Responsibility: aggregator contracts, reducer state, and output values.
//! Does not own: grouping or request orchestration.

mod output;
mod quantile;
mod spec;
mod state;

#[cfg(test)]
mod tests;

// re-exports
pub use output::{AggregateValue, Frequency};
pub use quantile::{quantile_linear, quantile_linear_sorted};
pub use spec::{AggregateKind, Aggregator, Reduction};

pub(crate) use quantile::validate_quantile;
pub(crate) use state::ReducerState;
