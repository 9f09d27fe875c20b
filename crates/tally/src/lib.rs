//! ## Crate layout
//! - `core`: typed values, tables, grouping, reducers, summaries, pipelines,
//!   configuration, and observability.
//! - `retail`: the shopping-trends request set built on the core.
//!
//! The `prelude` module re-exports the vocabulary used to declare and run
//! aggregation requests.

pub use tally_core as core;

pub mod retail;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Prelude
//

pub mod prelude {
    pub use crate::core::{config::EngineConfig, prelude::*};
}
