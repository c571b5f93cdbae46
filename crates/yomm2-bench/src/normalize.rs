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

//! Baseline normalization.
//!
//! The baseline run measures the harness with no dispatch work. Its mean and
//! median are subtracted from every other run. Standard deviation and
//! coefficient of variation describe noise and are left as reported.

use crate::axes::BASELINE_RUN;
use crate::error::{BenchError, Result};
use crate::run::Run;
use indexmap::IndexMap;
use tracing::warn;

/// What to do when a normalized mean comes out negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeTimingPolicy {
    /// Fail with [`BenchError::NegativeNormalizedTiming`].
    #[default]
    Error,
    /// Clamp negative mean and median to zero and log a warning.
    ClampToZero,
}

/// Removes the baseline run and subtracts it from every remaining run.
///
/// Returns the removed baseline. Insertion order of the remaining runs is
/// preserved.
///
/// # Errors
///
/// - [`BenchError::MissingBaseline`] if no run is named [`BASELINE_RUN`]
/// - [`BenchError::NegativeNormalizedTiming`] if a mean drops below zero
///   under [`NegativeTimingPolicy::Error`]
pub fn normalize(runs: &mut IndexMap<String, Run>, policy: NegativeTimingPolicy) -> Result<Run> {
    let baseline = runs
        .shift_remove(BASELINE_RUN)
        .ok_or_else(|| BenchError::MissingBaseline {
            name: BASELINE_RUN.to_string(),
        })?;

    for run in runs.values_mut() {
        let mut mean = run.mean() - baseline.mean();
        let mut median = run.median() - baseline.median();

        if mean < 0.0 || median < 0.0 {
            match policy {
                NegativeTimingPolicy::Error if mean < 0.0 => {
                    return Err(BenchError::NegativeNormalizedTiming {
                        tags: run.tags().to_vec(),
                        raw_mean: run.mean(),
                        baseline_mean: baseline.mean(),
                    });
                }
                NegativeTimingPolicy::Error => {}
                NegativeTimingPolicy::ClampToZero => {
                    warn!(
                        run = run.key(),
                        mean, median, "clamping negative normalized timing to zero"
                    );
                    mean = mean.max(0.0);
                    median = median.max(0.0);
                }
            }
        }

        run.set_timings(mean, median);
    }

    Ok(baseline)
}
