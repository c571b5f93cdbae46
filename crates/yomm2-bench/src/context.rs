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

//! Environment snapshot parsed from the `context` section of a report.
//!
//! The benchmark runner writes machine metadata as flat keys. Keys carrying
//! [`LIBRARY_PREFIX`] are custom context added by the library's benchmark
//! binary; they are routed into [`LibraryContext`] through a fixed allow-list.
//! Every other known key maps to a [`Context`] field.
//!
//! Typing is strict: a value that cannot be coerced to its field's type is an
//! error, never a default.

use crate::axes::LIBRARY_PREFIX;
use crate::error::{BenchError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Direct context keys understood by [`Context::parse`].
const DIRECT_FIELDS: &[&str] = &[
    "date",
    "host_name",
    "executable",
    "num_cpus",
    "mhz_per_cpu",
    "cpu_scaling_enabled",
    "caches",
    "load_avg",
    "library_build_type",
];

/// Library descriptor fields, without the prefix, in serialization order.
const LIBRARY_FIELDS: &[&str] = &[
    "build_type",
    "compiler",
    "compiler_version",
    "hierarchies",
    "objects",
];

/// One CPU cache level as reported by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cache {
    /// Cache kind, e.g. "Data", "Instruction", "Unified".
    #[serde(rename = "type")]
    pub cache_type: String,
    /// Cache level (1, 2, 3...).
    pub level: u32,
    /// Size in bytes.
    pub size: u64,
    /// Number of CPUs sharing this cache.
    pub num_sharing: u32,
}

impl Cache {
    fn parse(index: usize, value: &Value) -> Result<Self> {
        let field = format!("caches[{}]", index);
        let obj = value
            .as_object()
            .ok_or_else(|| BenchError::context(&field, "expected an object"))?;

        Ok(Self {
            cache_type: string(&format!("{}.type", field), required(obj, &field, "type")?)?,
            level: unsigned(&format!("{}.level", field), required(obj, &field, "level")?)?,
            size: unsigned(&format!("{}.size", field), required(obj, &field, "size")?)?,
            num_sharing: unsigned(
                &format!("{}.num_sharing", field),
                required(obj, &field, "num_sharing")?,
            )?,
        })
    }
}

/// Build and workload parameters of the library under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryContext {
    /// Library build type (debug/release).
    pub build_type: String,
    /// Compiler name.
    pub compiler: String,
    /// Compiler version.
    pub compiler_version: String,
    /// Number of class hierarchies compiled into the benchmark.
    pub hierarchies: u32,
    /// Number of live objects the benchmark dispatches on.
    pub objects: u64,
}

impl LibraryContext {
    /// Re-serializes the descriptor as prefixed flat keys.
    ///
    /// Values are emitted as strings, the form custom benchmark context takes
    /// in the runner's output.
    pub fn to_flat_keys(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for name in LIBRARY_FIELDS {
            let value = match *name {
                "build_type" => self.build_type.clone(),
                "compiler" => self.compiler.clone(),
                "compiler_version" => self.compiler_version.clone(),
                "hierarchies" => self.hierarchies.to_string(),
                _ => self.objects.to_string(),
            };
            map.insert(format!("{}{}", LIBRARY_PREFIX, name), Value::String(value));
        }
        map
    }
}

#[derive(Default)]
struct LibraryContextBuilder {
    build_type: Option<String>,
    compiler: Option<String>,
    compiler_version: Option<String>,
    hierarchies: Option<u32>,
    objects: Option<u64>,
}

impl LibraryContextBuilder {
    fn set(&mut self, key: &str, name: &str, value: &Value) -> Result<()> {
        match name {
            "build_type" => self.build_type = Some(string(key, value)?),
            "compiler" => self.compiler = Some(string(key, value)?),
            "compiler_version" => self.compiler_version = Some(string(key, value)?),
            "hierarchies" => self.hierarchies = Some(unsigned(key, value)?),
            "objects" => self.objects = Some(unsigned(key, value)?),
            _ => return Err(BenchError::context(key, "unknown library descriptor key")),
        }
        Ok(())
    }

    fn build(self) -> Result<LibraryContext> {
        fn take<T>(value: Option<T>, name: &str) -> Result<T> {
            value.ok_or_else(|| {
                BenchError::context(format!("{}{}", LIBRARY_PREFIX, name), "missing field")
            })
        }

        Ok(LibraryContext {
            build_type: take(self.build_type, "build_type")?,
            compiler: take(self.compiler, "compiler")?,
            compiler_version: take(self.compiler_version, "compiler_version")?,
            hierarchies: take(self.hierarchies, "hierarchies")?,
            objects: take(self.objects, "objects")?,
        })
    }
}

/// Machine and build metadata for one benchmark session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Context {
    /// Timestamp written by the runner.
    pub date: String,
    /// Host the benchmark ran on.
    pub host_name: String,
    /// Path of the benchmark executable.
    pub executable: String,
    /// Number of CPUs.
    pub num_cpus: u32,
    /// CPU frequency in MHz.
    pub mhz_per_cpu: u32,
    /// Whether CPU frequency scaling was enabled.
    pub cpu_scaling_enabled: bool,
    /// CPU caches, in report order.
    pub caches: Vec<Cache>,
    /// Recent load averages.
    pub load_avg: Vec<f64>,
    /// Build type of the benchmark runner library.
    pub library_build_type: String,
    /// Descriptor of the library under test.
    pub library: LibraryContext,
}

impl Context {
    /// Parses the `context` object of a benchmark report.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::MalformedContext`] when a required field is
    /// missing or mistyped, or when a prefixed key is not a known library
    /// descriptor field.
    pub fn parse(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| BenchError::context("context", "expected an object"))?;

        let mut library = LibraryContextBuilder::default();
        for (key, value) in obj {
            if let Some(name) = key.strip_prefix(LIBRARY_PREFIX) {
                library.set(key, name, value)?;
            } else if !DIRECT_FIELDS.contains(&key.as_str()) {
                debug!(key = %key, "ignoring unknown context key");
            }
        }

        let caches = required(obj, "context", "caches")?
            .as_array()
            .ok_or_else(|| BenchError::context("caches", "expected an array"))?
            .iter()
            .enumerate()
            .map(|(i, cache)| Cache::parse(i, cache))
            .collect::<Result<Vec<_>>>()?;

        let load_avg = required(obj, "context", "load_avg")?
            .as_array()
            .ok_or_else(|| BenchError::context("load_avg", "expected an array"))?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| {
                    BenchError::context(format!("load_avg[{}]", i), "expected a number")
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let cpu_scaling_enabled = required(obj, "context", "cpu_scaling_enabled")?
            .as_bool()
            .ok_or_else(|| BenchError::context("cpu_scaling_enabled", "expected a boolean"))?;

        Ok(Self {
            date: string("date", required(obj, "context", "date")?)?,
            host_name: string("host_name", required(obj, "context", "host_name")?)?,
            executable: string("executable", required(obj, "context", "executable")?)?,
            num_cpus: number("num_cpus", required(obj, "context", "num_cpus")?)?,
            mhz_per_cpu: number("mhz_per_cpu", required(obj, "context", "mhz_per_cpu")?)?,
            cpu_scaling_enabled,
            caches,
            load_avg,
            library_build_type: string(
                "library_build_type",
                required(obj, "context", "library_build_type")?,
            )?,
            library: library.build()?,
        })
    }
}

fn required<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value> {
    obj.get(key).ok_or_else(|| {
        let field = if parent == "context" {
            key.to_string()
        } else {
            format!("{}.{}", parent, key)
        };
        BenchError::context(field, "missing field")
    })
}

fn string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BenchError::context(field, format!("expected a string, got {}", value)))
}

/// Unsigned integer from a JSON number only.
fn number<T: TryFrom<u64>>(field: &str, value: &Value) -> Result<T> {
    let n = value.as_u64().ok_or_else(|| {
        BenchError::context(field, format!("expected an unsigned integer, got {}", value))
    })?;
    T::try_from(n).map_err(|_| BenchError::context(field, format!("{} is out of range", n)))
}

/// Unsigned integer from a JSON number or a decimal string.
fn unsigned<T: TryFrom<u64>>(field: &str, value: &Value) -> Result<T> {
    match value {
        Value::String(s) => {
            let n: u64 = s.trim().parse().map_err(|_| {
                BenchError::context(field, format!("'{}' is not an unsigned integer", s))
            })?;
            T::try_from(n).map_err(|_| BenchError::context(field, format!("{} is out of range", n)))
        }
        _ => number(field, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "date": "2024-03-02T10:11:12+01:00",
            "host_name": "bench-01",
            "executable": "build/tests/benchmarks",
            "num_cpus": 8,
            "mhz_per_cpu": 3600,
            "cpu_scaling_enabled": false,
            "caches": [
                {"type": "Data", "level": 1, "size": 32768, "num_sharing": 2},
                {"type": "Unified", "level": 3, "size": 8388608, "num_sharing": 8}
            ],
            "load_avg": [0.5, 0.75, 1.0],
            "library_build_type": "release",
            "yomm2_build_type": "release",
            "yomm2_compiler": "clang",
            "yomm2_compiler_version": "17.0.6",
            "yomm2_hierarchies": "8",
            "yomm2_objects": "1000"
        })
    }

    #[test]
    fn test_parse_context() {
        let ctx = Context::parse(&sample()).unwrap();
        assert_eq!(ctx.host_name, "bench-01");
        assert_eq!(ctx.num_cpus, 8);
        assert_eq!(ctx.mhz_per_cpu, 3600);
        assert!(!ctx.cpu_scaling_enabled);
        assert_eq!(ctx.caches.len(), 2);
        assert_eq!(ctx.caches[1].cache_type, "Unified");
        assert_eq!(ctx.caches[1].size, 8_388_608);
        assert_eq!(ctx.load_avg, vec![0.5, 0.75, 1.0]);
        assert_eq!(ctx.library.compiler, "clang");
        assert_eq!(ctx.library.hierarchies, 8);
        assert_eq!(ctx.library.objects, 1000);
    }

    #[test]
    fn test_library_keys_round_trip() {
        let input = sample();
        let ctx = Context::parse(&input).unwrap();
        let flat = ctx.library.to_flat_keys();

        let original: Map<String, Value> = input
            .as_object()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.starts_with(LIBRARY_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(flat, original);
    }

    #[test]
    fn test_integer_library_field_accepts_number() {
        let mut input = sample();
        input["yomm2_hierarchies"] = json!(4);
        let ctx = Context::parse(&input).unwrap();
        assert_eq!(ctx.library.hierarchies, 4);
    }

    #[test]
    fn test_uncoercible_library_field_fails() {
        let mut input = sample();
        input["yomm2_objects"] = json!("many");
        let err = Context::parse(&input).unwrap_err();
        assert!(matches!(
            err,
            BenchError::MalformedContext { ref field, .. } if field == "yomm2_objects"
        ));
    }

    #[test]
    fn test_unknown_library_key_fails() {
        let mut input = sample();
        input["yomm2_ti_ptrs"] = json!("3");
        assert!(matches!(
            Context::parse(&input),
            Err(BenchError::MalformedContext { .. })
        ));
    }

    #[test]
    fn test_missing_library_key_fails() {
        let mut input = sample();
        input.as_object_mut().unwrap().remove("yomm2_compiler");
        let err = Context::parse(&input).unwrap_err();
        assert_eq!(err, BenchError::context("yomm2_compiler", "missing field"));
    }

    #[test]
    fn test_missing_direct_field_fails() {
        let mut input = sample();
        input.as_object_mut().unwrap().remove("host_name");
        let err = Context::parse(&input).unwrap_err();
        assert_eq!(err, BenchError::context("host_name", "missing field"));
    }

    #[test]
    fn test_mistyped_direct_field_fails() {
        let mut input = sample();
        input["cpu_scaling_enabled"] = json!("no");
        assert!(Context::parse(&input).is_err());

        let mut input = sample();
        input["num_cpus"] = json!("8");
        assert!(Context::parse(&input).is_err());
    }

    #[test]
    fn test_bad_cache_entry_fails() {
        let mut input = sample();
        input["caches"] = json!([{"type": "Data", "level": 1, "size": 32768}]);
        let err = Context::parse(&input).unwrap_err();
        assert_eq!(err, BenchError::context("caches[0].num_sharing", "missing field"));
    }

    #[test]
    fn test_unknown_direct_key_is_ignored() {
        let mut input = sample();
        input["json_schema_version"] = json!(1);
        assert!(Context::parse(&input).is_ok());
    }
}
