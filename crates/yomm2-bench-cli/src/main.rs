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

//! `yomm2-bench` binary.
//!
//! Logs go to stderr, filtered by `RUST_LOG`; stdout carries only the report.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use yomm2_bench::orchestrator;
use yomm2_bench_cli::cli::Commands;
use yomm2_bench_cli::error::CliError;

#[derive(Parser)]
#[command(name = "yomm2-bench")]
#[command(author, version, about = "YOMM2 dispatch benchmark runner", long_about = None)]
struct Cli {
    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("yomm2_bench={}", level)
            .parse()
            .expect("valid log directive"),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Covers SIGINT, SIGTERM and SIGHUP. The handler only flags the interruption
// so the orchestration unwinds and restores the parameter header once the
// running child exits.
fn install_interrupt_handler() -> Result<(), CliError> {
    ctrlc::set_handler(|| {
        orchestrator::interrupt();
        tracing::warn!("termination requested, waiting for child process");
    })
    .map_err(|e| CliError::Signal(e.to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = install_interrupt_handler().and_then(|_| cli.command.execute());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
