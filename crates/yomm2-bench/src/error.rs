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

//! Error types for benchmark report construction and orchestration.
//!
//! Every variant is fatal to the current orchestration. None of them are
//! retried: schema mismatches, missing runs, compiler errors and broken
//! benchmark binaries all reproduce given the same inputs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while building, running or parsing benchmarks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    /// A context field is absent or has the wrong shape.
    #[error("Malformed context field '{field}': {reason}")]
    MalformedContext {
        /// Field name as it appears in the report
        field: String,
        /// Reason the field was rejected
        reason: String,
    },

    /// The reserved normalization run is not in the report.
    #[error("Missing baseline run '{name}'")]
    MissingBaseline {
        /// Name of the expected baseline run
        name: String,
    },

    /// The same run reported the same aggregate twice.
    #[error("Run '{run}' reports aggregate '{aggregate}' more than once")]
    DuplicateAggregate {
        /// Run identifier
        run: String,
        /// Aggregate kind
        aggregate: String,
    },

    /// A run is still missing aggregates after the whole report was read.
    #[error("Run '{run}' is missing aggregates: {}", .missing.join(", "))]
    IncompleteRun {
        /// Run identifier
        run: String,
        /// Names of the absent aggregates
        missing: Vec<String>,
    },

    /// Subtracting the baseline produced a negative mean.
    #[error(
        "Negative normalized timing for '{}': mean {raw_mean} is below baseline mean {baseline_mean}",
        .tags.join("-")
    )]
    NegativeNormalizedTiming {
        /// Tags of the offending run
        tags: Vec<String>,
        /// Raw mean of the run before normalization
        raw_mean: f64,
        /// Raw mean of the baseline run
        baseline_mean: f64,
    },

    /// No reference-strategy run shares this run's other tags.
    #[error("Run '{run}' has no comparator: expected '{expected}'")]
    MissingComparator {
        /// Run identifier lacking a comparator
        run: String,
        /// Identifier of the missing reference run
        expected: String,
    },

    /// The build command could not be started or exited unsuccessfully.
    #[error("Build failed ({command}): {reason}")]
    BuildFailed {
        /// Command line that was invoked
        command: String,
        /// Exit status or spawn error
        reason: String,
    },

    /// The benchmark output is not a valid report document.
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    /// I/O operation on a file failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },
}

impl BenchError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a context error for `field`.
    pub fn context(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContext {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(e: serde_json::Error) -> Self {
        BenchError::MalformedReport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BenchError::NegativeNormalizedTiming {
            tags: vec!["direct_intrusive".into(), "arity_1".into()],
            raw_mean: 90.0,
            baseline_mean: 100.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("direct_intrusive-arity_1"));
        assert!(msg.contains("90"));
        assert!(msg.contains("100"));

        let err = BenchError::IncompleteRun {
            run: "baseline".into(),
            missing: vec!["stddev".into(), "cv".into()],
        };
        assert_eq!(
            err.to_string(),
            "Run 'baseline' is missing aggregates: stddev, cv"
        );
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"truncated\":").unwrap_err();
        let err: BenchError = json_err.into();
        assert!(matches!(err, BenchError::MalformedReport(_)));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = BenchError::io_error(
            "tests/benchmarks_parameters.hpp",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("benchmarks_parameters.hpp"));
        assert!(msg.contains("gone"));
    }
}
