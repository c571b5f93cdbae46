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

//! Report construction from canned benchmark documents.

use proptest::prelude::*;
use serde_json::{json, Value};
use yomm2_bench::{
    orchestrate, BenchError, FixtureSource, NegativeTimingPolicy, Report, RunConfig,
};

fn context() -> Value {
    json!({
        "date": "2024-03-02T10:11:12+01:00",
        "host_name": "bench-01",
        "executable": "build/tests/benchmarks",
        "num_cpus": 8,
        "mhz_per_cpu": 3600,
        "cpu_scaling_enabled": false,
        "caches": [
            {"type": "Data", "level": 1, "size": 32768, "num_sharing": 2},
            {"type": "Unified", "level": 2, "size": 262144, "num_sharing": 2}
        ],
        "load_avg": [0.42, 0.37, 0.31],
        "library_build_type": "release",
        "yomm2_build_type": "release",
        "yomm2_compiler": "clang",
        "yomm2_compiler_version": "17.0.6",
        "yomm2_hierarchies": "1",
        "yomm2_objects": "1000"
    })
}

fn aggregates(name: &str, mean: f64, median: f64) -> Vec<Value> {
    [
        ("mean", mean),
        ("median", median),
        ("stddev", 2.5),
        ("cv", 0.015),
    ]
    .into_iter()
    .map(|(aggregate, cpu_time)| {
        json!({
            "name": format!("{}_{}", name, aggregate),
            "family_index": 0,
            "run_name": name,
            "run_type": "aggregate",
            "repetitions": 10,
            "aggregate_name": aggregate,
            "aggregate_unit": "time",
            "iterations": 10,
            "real_time": cpu_time * 1.01,
            "cpu_time": cpu_time,
            "time_unit": "ns"
        })
    })
    .collect()
}

fn document(runs: &[(&str, f64, f64)]) -> Value {
    let benchmarks: Vec<Value> = runs
        .iter()
        .flat_map(|(name, mean, median)| aggregates(name, *mean, *median))
        .collect();
    json!({ "context": context(), "benchmarks": benchmarks })
}

#[test]
fn test_scenario_reference_only() {
    let report = Report::parse(document(&[
        ("baseline", 100.0, 100.0),
        ("virtual_function-arity_1-ordinary_base", 150.0, 145.0),
    ]))
    .unwrap();

    assert_eq!(report.len(), 1);
    let run = report
        .get(&["virtual_function", "arity_1", "ordinary_base"])
        .unwrap();
    assert_eq!(run.mean(), 50.0);
    assert_eq!(run.median(), 45.0);
    assert_eq!(run.comparator_key(), None);
    assert!(report.comparator(run).is_none());
}

#[test]
fn test_scenario_comparator_link() {
    let report = Report::parse(document(&[
        ("baseline", 100.0, 100.0),
        ("virtual_function-arity_1-ordinary_base", 150.0, 150.0),
        ("direct_intrusive-arity_1-ordinary_base", 160.0, 160.0),
    ]))
    .unwrap();

    let run = report
        .get(&["direct_intrusive", "arity_1", "ordinary_base"])
        .unwrap();
    assert_eq!(run.mean(), 60.0);

    let comparator = report.comparator(run).unwrap();
    assert_eq!(comparator.key(), "virtual_function-arity_1-ordinary_base");
    assert_eq!(comparator.mean(), 50.0);
}

#[test]
fn test_scenario_missing_baseline() {
    let err = Report::parse(document(&[(
        "virtual_function-arity_1-ordinary_base",
        150.0,
        145.0,
    )]))
    .unwrap_err();
    assert!(matches!(err, BenchError::MissingBaseline { .. }));
}

#[test]
fn test_scenario_missing_comparator() {
    let err = Report::parse(document(&[
        ("baseline", 100.0, 100.0),
        ("virtual_function-arity_1-ordinary_base", 150.0, 145.0),
        ("direct_virtual_ptr-arity_2-virtual_base", 130.0, 130.0),
    ]))
    .unwrap_err();
    assert_eq!(
        err,
        BenchError::MissingComparator {
            run: "direct_virtual_ptr-arity_2-virtual_base".into(),
            expected: "virtual_function-arity_2-virtual_base".into(),
        }
    );
}

#[test]
fn test_negative_timing_policies() {
    let doc = document(&[
        ("baseline", 100.0, 100.0),
        ("virtual_function-arity_1-ordinary_base", 99.0, 98.0),
    ]);

    let err = Report::parse(doc.clone()).unwrap_err();
    assert!(matches!(err, BenchError::NegativeNormalizedTiming { .. }));

    let report = Report::parse_with(doc, NegativeTimingPolicy::ClampToZero).unwrap();
    assert_eq!(report.runs().next().unwrap().mean(), 0.0);
}

#[test]
fn test_normalization_runs_once_per_parse() {
    let doc = document(&[
        ("baseline", 100.0, 100.0),
        ("virtual_function-arity_2-virtual_base", 180.0, 170.0),
    ]);

    let first = Report::parse(doc.clone()).unwrap();
    // The raw document still holds unnormalized values.
    let second = Report::parse(first.raw().clone()).unwrap();

    let a = first.runs().next().unwrap();
    let b = second.runs().next().unwrap();
    assert_eq!(a.mean(), 80.0);
    assert_eq!(a.mean(), b.mean());
    assert_eq!(a.median(), b.median());
    assert_eq!(first.raw(), &doc);
}

#[test]
fn test_full_sweep_links_every_strategy() {
    let mut runs = vec![("baseline".to_string(), 10.0, 10.0)];
    for arity in yomm2_bench::axes::ARITY {
        for inheritance in yomm2_bench::axes::INHERITANCE {
            for (i, dispatch) in yomm2_bench::axes::DISPATCH.iter().enumerate() {
                let name = format!("{}-{}-{}", dispatch, arity, inheritance);
                let t = 20.0 + i as f64;
                runs.push((name, t, t));
            }
        }
    }
    let borrowed: Vec<(&str, f64, f64)> =
        runs.iter().map(|(n, m, d)| (n.as_str(), *m, *d)).collect();

    let report = Report::parse(document(&borrowed)).unwrap();
    assert_eq!(report.len(), runs.len() - 1);

    for run in report.runs() {
        match report.comparator(run) {
            Some(comparator) => {
                assert_ne!(run.dispatch(), "virtual_function");
                assert_eq!(comparator.dispatch(), "virtual_function");
                assert_eq!(comparator.other_tags(), run.other_tags());
            }
            None => assert_eq!(run.dispatch(), "virtual_function"),
        }
    }
    assert_eq!(report.comparisons().len(), 4 * 6);
}

#[test]
fn test_orchestrate_with_fixture_source() {
    let source = FixtureSource::new(document(&[
        ("baseline", 100.0, 100.0),
        ("virtual_function-arity_1-ordinary_base", 150.0, 145.0),
    ]));
    let report = orchestrate(&source, Some(8), &RunConfig::default()).unwrap();
    assert_eq!(report.context().library.hierarchies, 1);
    assert_eq!(report.len(), 1);
}

#[test]
fn test_fixture_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/report.json");
    let source = FixtureSource::from_file(path).unwrap();
    let report = orchestrate(&source, None, &RunConfig::default()).unwrap();

    assert_eq!(report.len(), 4);
    assert_eq!(report.context().caches.len(), 3);
    let run = report
        .get(&["basic_policy", "arity_1", "ordinary_base"])
        .unwrap();
    assert!((run.mean() - 3.1).abs() < 1e-9);
    assert_eq!(
        run.comparator_key(),
        Some("virtual_function-arity_1-ordinary_base")
    );
}

proptest! {
    #[test]
    fn prop_normalized_timings_subtract_baseline(
        base_mean in 0.0f64..1e6,
        base_median in 0.0f64..1e6,
        extra in proptest::collection::vec((0.0f64..1e6, 0.0f64..1e6), 1..6),
    ) {
        let names: Vec<String> = (0..extra.len())
            .map(|i| format!("virtual_function-arity_{}-ordinary_base", i))
            .collect();
        let mut runs = vec![("baseline", base_mean, base_median)];
        for (name, (dm, dd)) in names.iter().zip(&extra) {
            runs.push((name.as_str(), base_mean + dm, base_median + dd));
        }

        let report = Report::parse(document(&runs)).unwrap();
        prop_assert_eq!(report.len(), extra.len());

        for (name, raw_mean, raw_median) in &runs[1..] {
            let run = report.get_by_key(name).unwrap();
            prop_assert_eq!(run.mean(), raw_mean - base_mean);
            prop_assert_eq!(run.median(), raw_median - base_median);
        }
    }
}
