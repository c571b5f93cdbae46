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

//! Parsed, normalized and linked benchmark session.
//!
//! A [`Report`] is built in one pass from a decoded report document:
//!
//! 1. parse the environment snapshot from `context`
//! 2. accumulate run records from `benchmarks`
//! 3. remove the baseline run and subtract it from every other run
//! 4. link every non-reference run to its reference counterpart
//!
//! Construction either fully succeeds or returns an error. Once built, a
//! report is read-only.

use crate::axes::join_tags;
use crate::context::Context;
use crate::error::{BenchError, Result};
use crate::link::link_comparators;
use crate::normalize::{normalize, NegativeTimingPolicy};
use crate::run::{collect_runs, Run};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Relative performance of a run against its comparator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Run identifier.
    pub run: String,
    /// Comparator run identifier.
    pub comparator: String,
    /// Normalized mean of the run.
    pub mean: f64,
    /// Normalized mean of the comparator.
    pub comparator_mean: f64,
    /// `mean / comparator_mean`, absent when the comparator mean is 0.
    pub ratio: Option<f64>,
    /// Percentage change (positive = slower, negative = faster).
    pub change_pct: f64,
}

/// A benchmark session after baseline normalization and comparator linking.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(skip)]
    raw: Value,
    context: Context,
    baseline: Run,
    runs: IndexMap<String, Run>,
}

impl Report {
    /// Builds a report, failing on negative normalized means.
    pub fn parse(raw: Value) -> Result<Self> {
        Self::parse_with(raw, NegativeTimingPolicy::default())
    }

    /// Builds a report with an explicit negative-timing policy.
    ///
    /// # Errors
    ///
    /// Any of the construction errors: malformed context or benchmarks,
    /// duplicate or incomplete runs, missing baseline, negative normalized
    /// timing (under [`NegativeTimingPolicy::Error`]) or missing comparator.
    pub fn parse_with(raw: Value, policy: NegativeTimingPolicy) -> Result<Self> {
        let context = Context::parse(
            raw.get("context")
                .ok_or_else(|| BenchError::MalformedReport("missing 'context'".to_string()))?,
        )?;

        let benchmarks = raw
            .get("benchmarks")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                BenchError::MalformedReport("missing or non-array 'benchmarks'".to_string())
            })?;

        let mut runs = collect_runs(benchmarks)?;
        let baseline = normalize(&mut runs, policy)?;
        link_comparators(&mut runs)?;

        Ok(Self {
            raw,
            context,
            baseline,
            runs,
        })
    }

    /// Decodes and builds a report from JSON text.
    pub fn from_json_str(json: &str, policy: NegativeTimingPolicy) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        Self::parse_with(raw, policy)
    }

    /// The document the report was built from, unmodified.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The removed baseline run, with its raw timings.
    pub fn baseline(&self) -> &Run {
        &self.baseline
    }

    /// Looks up a run by its tags.
    ///
    /// ```no_run
    /// # fn demo(report: &yomm2_bench::Report) {
    /// let run = report.get(&["virtual_function", "arity_1", "ordinary_base"]);
    /// # }
    /// ```
    pub fn get<S: AsRef<str>>(&self, tags: &[S]) -> Option<&Run> {
        self.runs.get(&join_tags(tags))
    }

    /// Looks up a run by its full identifier.
    pub fn get_by_key(&self, key: &str) -> Option<&Run> {
        self.runs.get(key)
    }

    /// All runs except the baseline, in input order.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.values()
    }

    /// Number of runs, excluding the baseline.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Resolves the comparator of `run`.
    pub fn comparator(&self, run: &Run) -> Option<&Run> {
        run.comparator_key().and_then(|key| self.runs.get(key))
    }

    /// Compares `run` against its comparator, if it has one.
    pub fn comparison(&self, run: &Run) -> Option<Comparison> {
        let comparator = self.comparator(run)?;
        let (ratio, change_pct) = if comparator.mean() > 0.0 {
            (
                Some(run.mean() / comparator.mean()),
                (run.mean() - comparator.mean()) / comparator.mean() * 100.0,
            )
        } else {
            (None, 0.0)
        };

        Some(Comparison {
            run: run.key().to_string(),
            comparator: comparator.key().to_string(),
            mean: run.mean(),
            comparator_mean: comparator.mean(),
            ratio,
            change_pct,
        })
    }

    /// Comparisons for every linked run, in input order.
    pub fn comparisons(&self) -> Vec<Comparison> {
        self.runs().filter_map(|run| self.comparison(run)).collect()
    }
}
