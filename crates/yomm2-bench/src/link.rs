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

//! Comparator linking.
//!
//! Every run of a non-reference strategy is linked to the reference-strategy
//! run with the same arity and inheritance tags. A sweep is expected to cover
//! every strategy under every combination, so a missing link is an error.

use crate::axes::REFERENCE_DISPATCH;
use crate::error::{BenchError, Result};
use crate::run::Run;
use indexmap::IndexMap;

/// Attaches a comparator key to every non-reference run.
///
/// # Errors
///
/// Returns [`BenchError::MissingComparator`] for the first run whose
/// reference counterpart is absent.
pub fn link_comparators(runs: &mut IndexMap<String, Run>) -> Result<()> {
    let links = runs
        .values()
        .filter(|run| run.dispatch() != REFERENCE_DISPATCH)
        .map(|run| {
            let expected = run.key_with_dispatch(REFERENCE_DISPATCH);
            if runs.contains_key(&expected) {
                Ok((run.key().to_string(), expected))
            } else {
                Err(BenchError::MissingComparator {
                    run: run.key().to_string(),
                    expected,
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    for (key, comparator) in links {
        if let Some(run) = runs.get_mut(&key) {
            run.set_comparator(comparator);
        }
    }

    Ok(())
}
