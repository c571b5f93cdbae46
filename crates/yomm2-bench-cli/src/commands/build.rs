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

//! Build command.

use crate::error::CliError;
use yomm2_bench::BuildConfig;

/// Compiles the benchmark executable and prints its path.
pub fn build(config: &BuildConfig, hierarchies: Option<u32>) -> Result<(), CliError> {
    let exe = yomm2_bench::build(config, hierarchies)?;
    println!("{}", exe.display());
    Ok(())
}
