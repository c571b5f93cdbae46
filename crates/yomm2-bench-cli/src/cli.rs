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

//! Command definitions.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use yomm2_bench::config::DEFAULT_REPETITIONS;
use yomm2_bench::{BuildConfig, NegativeTimingPolicy, RunConfig};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Normalized runs and comparisons as JSON
    Json,
    /// Context section and per-combination tables
    Markdown,
}

/// Options shared by commands that compile the benchmark.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Build directory
    #[arg(long, value_name = "DIR", default_value = yomm2_bench::config::DEFAULT_BUILD_DIR)]
    pub build_dir: PathBuf,

    /// Number of class hierarchies to compile in
    #[arg(long, value_name = "N")]
    pub hierarchies: Option<u32>,

    /// Parameter header rewritten for the build
    #[arg(long, value_name = "FILE", default_value = yomm2_bench::axes::PARAMETERS_HEADER)]
    pub header: PathBuf,

    /// Build program
    #[arg(long, default_value = "make")]
    pub build_program: String,
}

impl BuildArgs {
    pub fn to_config(&self) -> BuildConfig {
        BuildConfig::new(&self.build_dir)
            .with_parameters_header(&self.header)
            .with_build_program(&self.build_program)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the benchmark executable
    ///
    /// With --hierarchies, the parameter header is rewritten for the build and
    /// restored afterwards.
    Build {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Compile, run and report
    ///
    /// Runs the benchmark with JSON output, aggregates only and random
    /// interleaving, then prints the normalized report.
    Run {
        #[command(flatten)]
        build: BuildArgs,

        /// Number of live objects (exported as YOMM2_BENCHMARKS_OBJECTS)
        #[arg(long, value_name = "N")]
        objects: Option<u64>,

        /// Repetitions per benchmark
        #[arg(long, default_value_t = DEFAULT_REPETITIONS)]
        repetitions: u32,

        /// Clamp negative normalized timings to zero instead of failing
        #[arg(long)]
        clamp_negative: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra arguments passed to the benchmark executable
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Report on a saved benchmark JSON file
    Parse {
        /// Benchmark JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Clamp negative normalized timings to zero instead of failing
        #[arg(long)]
        clamp_negative: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn policy(clamp_negative: bool) -> NegativeTimingPolicy {
    if clamp_negative {
        NegativeTimingPolicy::ClampToZero
    } else {
        NegativeTimingPolicy::Error
    }
}

impl Commands {
    /// Execute the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Build { build } => commands::build(&build.to_config(), build.hierarchies),
            Commands::Run {
                build,
                objects,
                repetitions,
                clamp_negative,
                format,
                output,
                extra,
            } => {
                let mut run = RunConfig::default()
                    .with_repetitions(repetitions)
                    .with_extra_args(extra)
                    .with_negative_timing(policy(clamp_negative));
                if let Some(objects) = objects {
                    run = run.with_objects(objects);
                }
                commands::run(
                    &build.to_config(),
                    build.hierarchies,
                    &run,
                    format,
                    output.as_deref(),
                )
            }
            Commands::Parse {
                file,
                clamp_negative,
                format,
                output,
            } => commands::parse(&file, policy(clamp_negative), format, output.as_deref()),
        }
    }
}
