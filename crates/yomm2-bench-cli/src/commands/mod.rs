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

//! Command implementations.

mod build;
mod parse;
mod run;

pub use build::build;
pub use parse::parse;
pub use run::run;

use crate::cli::OutputFormat;
use crate::error::CliError;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use yomm2_bench::{render, Comparison, Report};

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    report: &'a Report,
    comparisons: Vec<Comparison>,
}

/// Renders `report` in `format`.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            let summary = Summary {
                report,
                comparisons: report.comparisons(),
            };
            let mut json = serde_json::to_string_pretty(&summary)
                .map_err(|e| CliError::Render(e.to_string()))?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Markdown => {
            render::to_markdown(report).map_err(|e| CliError::Render(e.to_string()))
        }
    }
}

/// Writes `text` to `output`, or stdout when `None`.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, text).map_err(|e| CliError::io_error(path, e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::io_error("<stdout>", e))
        }
    }
}
