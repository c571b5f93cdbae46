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

//! Build and run configuration.

use crate::axes::PARAMETERS_HEADER;
use crate::normalize::NegativeTimingPolicy;
use std::path::{Path, PathBuf};

/// Default repetitions passed to the benchmark runner.
pub const DEFAULT_REPETITIONS: u32 = 10;

/// Default build directory.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// How to compile the benchmark executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Build directory passed to the build program.
    pub build_dir: PathBuf,
    /// Header rewritten to select the number of hierarchies.
    pub parameters_header: PathBuf,
    /// Build program, invoked as `<program> -C <build_dir> <target>`.
    pub build_program: String,
    /// Build target.
    pub target: String,
    /// Executable path; defaults to `<build_dir>/tests/benchmarks`.
    pub executable: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_DIR)
    }
}

impl BuildConfig {
    /// Creates a configuration building `benchmarks` with `make` in `build_dir`.
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            parameters_header: PathBuf::from(PARAMETERS_HEADER),
            build_program: "make".to_string(),
            target: "benchmarks".to_string(),
            executable: None,
        }
    }

    /// Sets the parameter header path.
    pub fn with_parameters_header(mut self, path: impl Into<PathBuf>) -> Self {
        self.parameters_header = path.into();
        self
    }

    /// Sets the build program.
    pub fn with_build_program(mut self, program: impl Into<String>) -> Self {
        self.build_program = program.into();
        self
    }

    /// Sets the build target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Overrides the executable path.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Path of the compiled benchmark executable.
    pub fn executable(&self) -> PathBuf {
        self.executable
            .clone()
            .unwrap_or_else(|| self.build_dir.join("tests").join("benchmarks"))
    }

    /// Arguments passed to the build program.
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "-C".to_string(),
            path_arg(&self.build_dir),
            self.target.clone(),
        ]
    }

    /// Full build command line, for logs and errors.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.build_program.clone()];
        parts.extend(self.build_args());
        parts.join(" ")
    }
}

/// How to run the benchmark executable and interpret its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Repetitions per benchmark.
    pub repetitions: u32,
    /// Extra arguments appended after the fixed flags.
    pub extra_args: Vec<String>,
    /// Live object count, exported to the benchmark binary.
    pub objects: Option<u64>,
    /// Handling of negative normalized timings.
    pub negative_timing: NegativeTimingPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            extra_args: Vec::new(),
            objects: None,
            negative_timing: NegativeTimingPolicy::Error,
        }
    }
}

impl RunConfig {
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_objects(mut self, objects: u64) -> Self {
        self.objects = Some(objects);
        self
    }

    pub fn with_negative_timing(mut self, policy: NegativeTimingPolicy) -> Self {
        self.negative_timing = policy;
        self
    }

    /// Fixed runner flags followed by the extra arguments.
    pub fn benchmark_args(&self) -> Vec<String> {
        let mut args = vec![
            "--benchmark_format=json".to_string(),
            format!("--benchmark_repetitions={}", self.repetitions),
            "--benchmark_report_aggregates_only=true".to_string(),
            "--benchmark_enable_random_interleaving=true".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let config = BuildConfig::new("out");
        assert_eq!(config.executable(), PathBuf::from("out/tests/benchmarks"));
        assert_eq!(config.command_line(), "make -C out benchmarks");
        assert_eq!(
            config.parameters_header,
            PathBuf::from("tests/benchmarks_parameters.hpp")
        );
    }

    #[test]
    fn test_build_overrides() {
        let config = BuildConfig::default()
            .with_build_program("ninja")
            .with_target("bench")
            .with_executable("/tmp/bm");
        assert_eq!(config.command_line(), "ninja -C build bench");
        assert_eq!(config.executable(), PathBuf::from("/tmp/bm"));
    }

    #[test]
    fn test_benchmark_args() {
        let config = RunConfig::default()
            .with_repetitions(3)
            .with_extra_args(["--benchmark_filter=arity_1"]);
        assert_eq!(
            config.benchmark_args(),
            vec![
                "--benchmark_format=json",
                "--benchmark_repetitions=3",
                "--benchmark_report_aggregates_only=true",
                "--benchmark_enable_random_interleaving=true",
                "--benchmark_filter=arity_1",
            ]
        );
    }
}
