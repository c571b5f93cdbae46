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

//! Error types for the command-line front end.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use yomm2_bench::BenchError;

/// Errors surfaced by `yomm2-bench` commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Building, running or parsing the benchmark failed.
    #[error(transparent)]
    Bench(#[from] BenchError),

    /// Writing command output failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Rendering the report failed.
    #[error("Render error: {0}")]
    Render(String),

    /// The interrupt handler could not be installed.
    #[error("Signal handler error: {0}")]
    Signal(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
