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

//! Markdown fragments for an external document writer.
//!
//! The writer owns the output file; these functions only append to a
//! [`fmt::Write`] sink.

use crate::axes::DISPATCH;
use crate::context::Context;
use crate::report::Report;
use crate::run::Run;
use std::fmt::{self, Write};

/// Writes the `## Context` section.
pub fn write_context<W: Write>(out: &mut W, context: &Context) -> fmt::Result {
    let lib = &context.library;

    writeln!(out, "## Context")?;
    writeln!(out)?;
    writeln!(out, "{} hierarchies of {} objects", lib.hierarchies, lib.objects)?;
    writeln!(out, "Compiler: {} {}", lib.compiler, lib.compiler_version)?;
    writeln!(out, "Build type: {}", lib.build_type)?;

    let load: Vec<String> = context.load_avg.iter().map(|l| format!("{:.2}", l)).collect();
    writeln!(out, "Load average: {}", load.join(", "))?;

    writeln!(out, "Run on `{}` on {}", context.host_name, context.date)?;
    writeln!(out, "{} X {} MHZ CPUs", context.num_cpus, context.mhz_per_cpu)?;
    writeln!(out, "CPU caches:  ")?;
    for cache in &context.caches {
        writeln!(
            out,
            "&nbsp;&nbsp;L{} {} {} KiB (x{})",
            cache.level,
            cache.cache_type,
            cache.size / 1024,
            cache.num_sharing
        )?;
    }
    Ok(())
}

/// Writes one table row per run, in report order.
pub fn write_runs<W: Write>(out: &mut W, report: &Report) -> fmt::Result {
    writeln!(out, "| Run | Mean | Median | Stddev | CV | vs reference |")?;
    writeln!(out, "|-----|------|--------|--------|----|--------------|")?;

    for run in report.runs() {
        writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:.2} | {:.4} | {} |",
            run.key(),
            run.mean(),
            run.median(),
            run.stddev(),
            run.cv(),
            ratio_cell(report, run)
        )?;
    }
    Ok(())
}

/// Writes one table per arity/inheritance combination, strategies as rows.
pub fn write_matrix<W: Write>(out: &mut W, report: &Report) -> fmt::Result {
    let mut groups: Vec<&[String]> = Vec::new();
    for run in report.runs() {
        if !groups.contains(&run.other_tags()) {
            groups.push(run.other_tags());
        }
    }

    for group in groups {
        let mut rows: Vec<&Run> = report
            .runs()
            .filter(|run| run.other_tags() == group)
            .collect();
        rows.sort_by_key(|run| dispatch_rank(run.dispatch()));

        writeln!(out, "### {}", group.join(", "))?;
        writeln!(out)?;
        writeln!(out, "| Dispatch | Mean | vs reference |")?;
        writeln!(out, "|----------|------|--------------|")?;
        for run in rows {
            writeln!(
                out,
                "| {} | {:.2} | {} |",
                run.dispatch(),
                run.mean(),
                ratio_cell(report, run)
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Renders the whole report as one markdown document.
pub fn to_markdown(report: &Report) -> Result<String, fmt::Error> {
    let mut md = String::new();
    write_context(&mut md, report.context())?;
    writeln!(md)?;
    writeln!(md, "## Results")?;
    writeln!(md)?;
    write_matrix(&mut md, report)?;
    Ok(md)
}

fn ratio_cell(report: &Report, run: &Run) -> String {
    report
        .comparison(run)
        .and_then(|c| c.ratio)
        .map(|ratio| format!("{:.2}x", ratio))
        .unwrap_or_else(|| "-".to_string())
}

/// Position in [`DISPATCH`]; unknown strategies sort last, stably.
fn dispatch_rank(dispatch: &str) -> usize {
    DISPATCH
        .iter()
        .position(|d| *d == dispatch)
        .unwrap_or(DISPATCH.len())
}
