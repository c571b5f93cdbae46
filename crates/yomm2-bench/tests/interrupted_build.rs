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


//! Interruption handling around the build and run steps.
//!
//! The interruption flag is process-wide, so everything touching it lives in
//! this single test binary and a single test.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use yomm2_bench::orchestrator::{interrupt, is_interrupted};
use yomm2_bench::{build, run_executable, BenchError, BuildConfig, RunConfig};

#[test]
fn test_interruption_fails_one_step_and_restores_header() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("benchmarks_parameters.hpp");
    fs::write(&header, "#define X 1\n").unwrap();
    let config = BuildConfig::new(dir.path())
        .with_parameters_header(&header)
        .with_build_program("true");

    interrupt();
    match build(&config, Some(4)).unwrap_err() {
        BenchError::BuildFailed { reason, .. } => assert_eq!(reason, "interrupted"),
        other => panic!("expected BuildFailed, got {:?}", other),
    }
    assert_eq!(fs::read(&header).unwrap(), b"#define X 1\n");
    assert!(!is_interrupted());

    // The next build is unaffected.
    build(&config, Some(4)).unwrap();
    assert_eq!(fs::read(&header).unwrap(), b"#define X 1\n");

    interrupt();
    let err = run_executable(Path::new("true"), &RunConfig::default()).unwrap_err();
    assert_eq!(err, BenchError::MalformedReport("benchmark interrupted".to_string()));
    assert!(!is_interrupted());
}
