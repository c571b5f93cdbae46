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

//! Parse command.

use super::{render_report, write_output};
use crate::cli::OutputFormat;
use crate::error::CliError;
use std::path::Path;
use yomm2_bench::{orchestrate, FixtureSource, NegativeTimingPolicy, RunConfig};

/// Reports on a saved benchmark JSON file.
pub fn parse(
    file: &Path,
    policy: NegativeTimingPolicy,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let source = FixtureSource::from_file(file)?;
    let run = RunConfig::default().with_negative_timing(policy);
    let report = orchestrate(&source, None, &run)?;

    write_output(&render_report(&report, format)?, output)
}
