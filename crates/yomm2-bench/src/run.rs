// Dweve YOMM2 Bench - dispatch benchmark tooling
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Run records built from the `benchmarks` array of a report.
//!
//! The runner emits one element per (run, aggregate) pair, so a run is
//! accumulated in a [`RunBuilder`] across several elements and frozen into a
//! [`Run`] once the whole array has been read.

use crate::axes::{join_tags, split_tags};
use crate::error::{BenchError, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Aggregate statistic reported for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    /// Arithmetic mean over repetitions.
    Mean,
    /// Median over repetitions.
    Median,
    /// Standard deviation over repetitions.
    StdDev,
    /// Coefficient of variation.
    Cv,
}

impl Aggregate {
    /// All aggregates, in report order.
    pub const ALL: [Aggregate; 4] = [
        Aggregate::Mean,
        Aggregate::Median,
        Aggregate::StdDev,
        Aggregate::Cv,
    ];

    /// Name used by the runner.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Mean => "mean",
            Aggregate::Median => "median",
            Aggregate::StdDev => "stddev",
            Aggregate::Cv => "cv",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregate {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Aggregate::Mean),
            "median" => Ok(Aggregate::Median),
            "stddev" => Ok(Aggregate::StdDev),
            "cv" => Ok(Aggregate::Cv),
            other => Err(BenchError::MalformedReport(format!(
                "unknown aggregate '{}'",
                other
            ))),
        }
    }
}

/// Accumulates the aggregates of one run.
#[derive(Debug, Clone)]
pub struct RunBuilder {
    name: String,
    values: [Option<f64>; 4],
}

impl RunBuilder {
    /// Creates an empty builder for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: [None; 4],
        }
    }

    /// Run identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records one aggregate. Setting the same aggregate twice is an error.
    pub fn set(&mut self, aggregate: Aggregate, value: f64) -> Result<()> {
        let slot = &mut self.values[aggregate as usize];
        if slot.is_some() {
            return Err(BenchError::DuplicateAggregate {
                run: self.name.clone(),
                aggregate: aggregate.to_string(),
            });
        }
        *slot = Some(value);
        Ok(())
    }

    /// Freezes the builder.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::IncompleteRun`] listing every aggregate that was
    /// never set.
    pub fn finish(self) -> Result<Run> {
        let missing: Vec<String> = Aggregate::ALL
            .iter()
            .filter(|a| self.values[**a as usize].is_none())
            .map(|a| a.to_string())
            .collect();

        match self.values {
            [Some(mean), Some(median), Some(stddev), Some(cv)] => Ok(Run {
                tags: split_tags(&self.name),
                key: self.name,
                mean,
                median,
                stddev,
                cv,
                comparator: None,
            }),
            _ => Err(BenchError::IncompleteRun {
                run: self.name,
                missing,
            }),
        }
    }
}

/// One benchmark run with its aggregate timings.
///
/// Times are in the runner's native unit. After report construction `mean`
/// and `median` are normalized against the baseline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    #[serde(rename = "run_name")]
    key: String,
    #[serde(skip)]
    tags: Vec<String>,
    mean: f64,
    median: f64,
    stddev: f64,
    cv: f64,
    comparator: Option<String>,
}

impl Run {
    /// Full run identifier, the report's lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All tags, dispatch strategy first.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Dispatch strategy tag.
    pub fn dispatch(&self) -> &str {
        &self.tags[0]
    }

    /// Tags after the dispatch strategy.
    pub fn other_tags(&self) -> &[String] {
        &self.tags[1..]
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    pub fn cv(&self) -> f64 {
        self.cv
    }

    /// Key of the reference-strategy run this run compares against.
    pub fn comparator_key(&self) -> Option<&str> {
        self.comparator.as_deref()
    }

    /// Identifier of this run with the dispatch tag replaced.
    pub fn key_with_dispatch(&self, dispatch: &str) -> String {
        let mut tags: Vec<&str> = Vec::with_capacity(self.tags.len());
        tags.push(dispatch);
        tags.extend(self.other_tags().iter().map(String::as_str));
        join_tags(&tags)
    }

    pub(crate) fn set_timings(&mut self, mean: f64, median: f64) {
        self.mean = mean;
        self.median = median;
    }

    pub(crate) fn set_comparator(&mut self, key: String) {
        self.comparator = Some(key);
    }
}

/// Reads the `benchmarks` array into runs keyed by run identifier.
///
/// Element order does not matter. Elements with `run_type` "iteration" carry
/// no aggregate and are skipped; any other element without a valid
/// `run_name`, `aggregate_name` and `cpu_time` is rejected.
pub fn collect_runs(benchmarks: &[Value]) -> Result<IndexMap<String, Run>> {
    let mut builders: IndexMap<String, RunBuilder> = IndexMap::new();

    for (i, element) in benchmarks.iter().enumerate() {
        let obj = element.as_object().ok_or_else(|| {
            BenchError::MalformedReport(format!("benchmarks[{}] is not an object", i))
        })?;

        let run_name = obj.get("run_name").and_then(Value::as_str).ok_or_else(|| {
            BenchError::MalformedReport(format!("benchmarks[{}] has no run_name", i))
        })?;

        let aggregate = match obj.get("aggregate_name").and_then(Value::as_str) {
            Some(name) => name.parse::<Aggregate>()?,
            None if obj.get("run_type").and_then(Value::as_str) == Some("iteration") => {
                debug!(run = run_name, "skipping iteration element");
                continue;
            }
            None => {
                return Err(BenchError::MalformedReport(format!(
                    "benchmarks[{}] has no aggregate_name",
                    i
                )))
            }
        };

        let cpu_time = obj.get("cpu_time").and_then(Value::as_f64).ok_or_else(|| {
            BenchError::MalformedReport(format!("benchmarks[{}] has no numeric cpu_time", i))
        })?;

        builders
            .entry(run_name.to_string())
            .or_insert_with(|| RunBuilder::new(run_name))
            .set(aggregate, cpu_time)?;
    }

    builders
        .into_iter()
        .map(|(key, builder)| Ok((key, builder.finish()?)))
        .collect()
}
