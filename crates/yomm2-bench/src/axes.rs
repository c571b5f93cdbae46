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

//! Benchmark axes and reserved names.
//!
//! A run identifier is the dispatch strategy followed by the arity and the
//! inheritance style, joined with [`TAG_DELIMITER`].

/// Dispatch strategies, reference first.
pub const DISPATCH: &[&str] = &[
    "virtual_function",
    "basic_policy",
    "compact_map_policy",
    "direct_intrusive",
    "indirect_intrusive",
    "direct_virtual_ptr",
    "indirect_virtual_ptr",
];

/// Method arities.
pub const ARITY: &[&str] = &["arity_1", "arity_2"];

/// Inheritance styles.
pub const INHERITANCE: &[&str] = &["ordinary_base", "virtual_base"];

/// Strategy every other strategy is compared against.
pub const REFERENCE_DISPATCH: &str = "virtual_function";

/// Run subtracted from every other run.
pub const BASELINE_RUN: &str = "baseline";

/// Separator between tags in a run identifier. Tags must not contain it.
pub const TAG_DELIMITER: char = '-';

/// Context keys starting with this belong to the library descriptor.
pub const LIBRARY_PREFIX: &str = "yomm2_";

/// Header rewritten to select the number of hierarchies.
pub const PARAMETERS_HEADER: &str = "tests/benchmarks_parameters.hpp";

/// Macro bound in [`PARAMETERS_HEADER`].
pub const HIERARCHIES_MACRO: &str = "YOMM2_BENCHMARK_HIERARCHIES";

/// Environment variable read by the benchmark binary.
pub const OBJECTS_ENV: &str = "YOMM2_BENCHMARKS_OBJECTS";

/// Joins tags into a run identifier.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    let mut key = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            key.push(TAG_DELIMITER);
        }
        key.push_str(tag.as_ref());
    }
    key
}

/// Splits a run identifier into tags.
pub fn split_tags(run_name: &str) -> Vec<String> {
    run_name.split(TAG_DELIMITER).map(str::to_string).collect()
}
