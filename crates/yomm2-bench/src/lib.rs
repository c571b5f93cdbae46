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

//! YOMM2 Dispatch Benchmarks
//!
//! Builds the YOMM2 benchmark executable, runs it, and turns its JSON output
//! into a normalized [`Report`] comparing dispatch strategies.
//!
//! ## Features
//!
//! - **Orchestration**: compile under a given number of hierarchies, with the
//!   parameter header restored on every exit path
//! - **Normalization**: subtract the no-op baseline from every run
//! - **Comparison**: link each strategy to the reference `virtual_function` run
//! - **Rendering**: markdown fragments for documentation writers
//!
//! ## Usage
//!
//! ```no_run
//! use yomm2_bench::{orchestrate, BuildConfig, ExecutableSource, RunConfig};
//!
//! let source = ExecutableSource::new(BuildConfig::new("build"));
//! let report = orchestrate(&source, Some(8), &RunConfig::default())?;
//! for run in report.runs() {
//!     println!("{}: {:.2}", run.key(), run.mean());
//! }
//! # Ok::<(), yomm2_bench::BenchError>(())
//! ```

pub mod axes;
pub mod config;
pub mod context;
pub mod error;
pub mod link;
pub mod normalize;
pub mod orchestrator;
pub mod render;
pub mod report;
pub mod run;

pub use config::{BuildConfig, RunConfig};
pub use context::{Cache, Context, LibraryContext};
pub use error::{BenchError, Result};
pub use normalize::NegativeTimingPolicy;
pub use orchestrator::{
    build, orchestrate, run_executable, BenchmarkSource, ExecutableSource, FixtureSource,
    ParameterOverride,
};
pub use report::{Comparison, Report};
pub use run::{Aggregate, Run, RunBuilder};
