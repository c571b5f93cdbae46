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

//! Building and running the benchmark executable.
//!
//! The number of hierarchies is a compile-time parameter, selected by
//! temporarily rewriting a header before invoking the build. The header is a
//! single shared file: concurrent orchestrations against the same source tree
//! must be serialized by the caller.
//!
//! Child processes run in the foreground with no timeout. Callers that need
//! bounded latency wrap the invocation themselves.

use crate::axes::{HIERARCHIES_MACRO, OBJECTS_ENV};
use crate::config::{BuildConfig, RunConfig};
use crate::error::{BenchError, Result};
use crate::report::Report;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Marks the current orchestration as interrupted.
///
/// Meant to be called from a signal handler. The running child receives the
/// signal itself; once it exits the step that was waiting on it fails and
/// scoped cleanup runs. The interruption is consumed by that step, so later
/// steps in the same process start clean.
pub fn interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Whether an interruption is pending.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Temporary rewrite of the parameter header.
///
/// The original contents are restored when the guard is dropped, on every
/// exit path. [`ParameterOverride::restore`] restores eagerly and reports
/// write failures.
#[derive(Debug)]
pub struct ParameterOverride {
    path: PathBuf,
    original: Option<Vec<u8>>,
}

impl ParameterOverride {
    /// Saves the header at `path` and binds the hierarchy count to `hierarchies`.
    pub fn install(path: impl Into<PathBuf>, hierarchies: u32) -> Result<Self> {
        let path = path.into();
        let original = fs::read(&path).map_err(|e| BenchError::io_error(&path, e))?;

        let guard = Self {
            path,
            original: Some(original),
        };
        fs::write(&guard.path, definition(hierarchies))
            .map_err(|e| BenchError::io_error(&guard.path, e))?;
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the original contents back.
    pub fn restore(mut self) -> Result<()> {
        self.write_back()
    }

    fn write_back(&mut self) -> Result<()> {
        match self.original.take() {
            Some(original) => {
                fs::write(&self.path, original).map_err(|e| BenchError::io_error(&self.path, e))
            }
            None => Ok(()),
        }
    }
}

impl Drop for ParameterOverride {
    fn drop(&mut self) {
        if let Err(e) = self.write_back() {
            error!(error = %e, "failed to restore parameter header");
        }
    }
}

/// Header contents selecting `hierarchies` hierarchies.
pub fn definition(hierarchies: u32) -> String {
    format!("#define {} {}\n", HIERARCHIES_MACRO, hierarchies)
}

/// Compiles the benchmark executable and returns its path.
///
/// When `hierarchies` is given the parameter header is overridden for the
/// duration of the build and restored afterwards, whether the build succeeds
/// or not.
///
/// # Errors
///
/// - [`BenchError::Io`] if the header cannot be read, written or restored
/// - [`BenchError::BuildFailed`] if the build program cannot be started,
///   exits unsuccessfully or is interrupted
pub fn build(config: &BuildConfig, hierarchies: Option<u32>) -> Result<PathBuf> {
    let exe = config.executable();

    let guard = match hierarchies {
        Some(n) => {
            info!("compiling {} for {} hierarchies", exe.display(), n);
            Some(ParameterOverride::install(&config.parameters_header, n)?)
        }
        None => None,
    };

    let command = config.command_line();
    let status = Command::new(&config.build_program)
        .args(config.build_args())
        .stdout(Stdio::null())
        .status()
        .map_err(|e| BenchError::BuildFailed {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    if take_interrupt() {
        return Err(BenchError::BuildFailed {
            command,
            reason: "interrupted".to_string(),
        });
    }

    if !status.success() {
        return Err(BenchError::BuildFailed {
            command,
            reason: status.to_string(),
        });
    }

    if let Some(guard) = guard {
        guard.restore()?;
    }

    Ok(exe)
}

/// Runs the benchmark executable and decodes its standard output.
///
/// # Errors
///
/// - [`BenchError::Io`] if the executable cannot be started
/// - [`BenchError::MalformedReport`] if standard output is not exactly one
///   JSON document
pub fn run_executable(exe: &Path, config: &RunConfig) -> Result<Value> {
    let args = config.benchmark_args();

    let mut command = Command::new(exe);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let log_prefix = match config.objects {
        Some(objects) => {
            command.env(OBJECTS_ENV, objects.to_string());
            format!("{}={} ", OBJECTS_ENV, objects)
        }
        None => String::new(),
    };

    info!("running {}{} {}", log_prefix, exe.display(), args.join(" "));

    let output = command.output().map_err(|e| BenchError::io_error(exe, e))?;

    if take_interrupt() {
        return Err(BenchError::MalformedReport(
            "benchmark interrupted".to_string(),
        ));
    }

    match serde_json::from_slice::<Value>(&output.stdout) {
        Ok(value) => {
            if !output.status.success() {
                warn!(status = %output.status, "benchmark exited unsuccessfully");
            }
            Ok(value)
        }
        Err(e) if output.status.success() => Err(e.into()),
        Err(e) => Err(BenchError::MalformedReport(format!(
            "{} (benchmark {})",
            e, output.status
        ))),
    }
}

/// Source of raw benchmark report documents.
///
/// Report construction only depends on this, so it can be exercised with
/// canned documents instead of a compiler and an executable.
pub trait BenchmarkSource {
    /// Produces one report document for `hierarchies` hierarchies.
    fn fetch(&self, hierarchies: Option<u32>, run: &RunConfig) -> Result<Value>;
}

/// Builds and runs the real benchmark executable.
#[derive(Debug, Clone)]
pub struct ExecutableSource {
    build: BuildConfig,
}

impl ExecutableSource {
    pub fn new(build: BuildConfig) -> Self {
        Self { build }
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

impl BenchmarkSource for ExecutableSource {
    fn fetch(&self, hierarchies: Option<u32>, run: &RunConfig) -> Result<Value> {
        let exe = build(&self.build, hierarchies)?;
        run_executable(&exe, run)
    }
}

/// Serves a fixed document, ignoring the requested parameters.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    document: Value,
}

impl FixtureSource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Loads a saved report from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| BenchError::io_error(path, e))?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }
}

impl BenchmarkSource for FixtureSource {
    fn fetch(&self, _hierarchies: Option<u32>, _run: &RunConfig) -> Result<Value> {
        Ok(self.document.clone())
    }
}

/// Fetches a document from `source` and builds the report.
pub fn orchestrate(
    source: &dyn BenchmarkSource,
    hierarchies: Option<u32>,
    run: &RunConfig,
) -> Result<Report> {
    let raw = source.fetch(hierarchies, run)?;
    Report::parse_with(raw, run.negative_timing)
}
