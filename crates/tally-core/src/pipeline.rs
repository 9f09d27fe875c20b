//! Module: pipeline
//! Responsibility: run a named batch of aggregation requests against one table.
//! Does not own: request validation or reduction (see `request`).
//!
//! A run is all-or-nothing: either every request succeeds and every summary
//! is returned, or the error of the earliest failing request (in declaration
//! order) is returned, annotated with that request's name.

use crate::{
    config::EngineConfig,
    error::Error,
    obs::sink::{MetricsEvent, record},
    request::AggregationRequest,
    summary::SummaryTable,
    table::Table,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

///
/// Pipeline
///

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: EngineConfig,
    requests: Vec<(String, AggregationRequest)>,
}

impl Pipeline {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            requests: Vec::new(),
        }
    }

    /// Append a named request.
    #[must_use]
    pub fn request(mut self, name: impl Into<String>, request: AggregationRequest) -> Self {
        self.requests.push((name.into(), request));
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Request names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    // Logging
    fn debug_log(&self, s: impl AsRef<str>) {
        if self.config.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    /// Execute every request against `table`.
    pub fn run(&self, table: &Table) -> Result<PipelineOutput, Error> {
        let mut seen = BTreeSet::new();
        for (name, _) in &self.requests {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateRequest { name: name.clone() });
            }
        }

        let parallel = self.config.runs_parallel();
        self.debug_log(format!(
            "pipeline: {} request(s) over {} row(s) ({})",
            self.requests.len(),
            table.len(),
            if parallel { "parallel" } else { "sequential" },
        ));
        record(MetricsEvent::PipelineStart {
            requests: self.requests.len() as u64,
        });

        let results = if parallel {
            self.execute_parallel(table)
        } else {
            self.execute_sequential(table)
        };

        // Events are recorded here, on the calling thread, in declaration order.
        let mut summaries = BTreeMap::new();
        let mut failure = None;
        for ((name, _), result) in self.requests.iter().zip(results) {
            match result {
                Ok(summary) => {
                    self.debug_log(format!("request '{name}': {} group(s)", summary.len()));
                    record(MetricsEvent::RequestFinish {
                        rows_scanned: table.len() as u64,
                        groups: summary.len() as u64,
                    });
                    summaries.insert(name.clone(), summary);
                }
                Err(err) => {
                    self.debug_log(format!("request '{name}' failed: {err}"));
                    record(MetricsEvent::RequestError);
                    failure = Some(err.in_request(name.as_str()));
                    break;
                }
            }
        }

        record(MetricsEvent::PipelineFinish {
            ok: failure.is_none(),
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(PipelineOutput(summaries)),
        }
    }

    // Stops at the first failure; later requests never run.
    fn execute_sequential(&self, table: &Table) -> Vec<Result<SummaryTable, Error>> {
        let mut results = Vec::with_capacity(self.requests.len());
        for (_, request) in &self.requests {
            let result = request.apply(table);
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }

        results
    }

    #[cfg(feature = "parallel")]
    fn execute_parallel(&self, table: &Table) -> Vec<Result<SummaryTable, Error>> {
        use rayon::prelude::*;

        self.requests
            .par_iter()
            .map(|(_, request)| request.apply(table))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn execute_parallel(&self, table: &Table) -> Vec<Result<SummaryTable, Error>> {
        self.execute_sequential(table)
    }
}

///
/// PipelineOutput
///
/// Summaries keyed by request name.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PipelineOutput(BTreeMap<String, SummaryTable>);

impl PipelineOutput {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SummaryTable> {
        self.0.get(name)
    }

    /// Take ownership of one summary.
    pub fn remove(&mut self, name: &str) -> Option<SummaryTable> {
        self.0.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryTable)> {
        self.0.iter().map(|(name, summary)| (name.as_str(), summary))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, SummaryTable> {
        self.0
    }
}

///
/// TESTS
///
