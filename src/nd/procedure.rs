// SPDX-License-Identifier: Apache-2.0
// Copyright 2025, 2026 Joe Pearson
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Waypoint;

/// Whether a procedure leaves or enters an airport.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcedureKind {
    /// Standard Instrument Departure.
    Sid,
    /// Standard Terminal Arrival Route.
    Star,
}

/// A named SID or STAR tied to an airport and runway.
///
/// The waypoints are ordered; for a SID the terminal fix is the transition
/// to enroute, for a STAR the initial fix is the arrival transition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Procedure {
    pub name: String,
    pub airport_icao: String,
    pub runway: String,
    pub kind: ProcedureKind,
    pub waypoints: Vec<Waypoint>,
}

/// All known procedures, indexed per airport.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcedureStore {
    procedures: Vec<Procedure>,
    by_airport: HashMap<String, Vec<usize>>,
}

impl ProcedureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, procedure: Procedure) {
        let idx = self.procedures.len();
        self.by_airport
            .entry(procedure.airport_icao.clone())
            .or_default()
            .push(idx);
        self.procedures.push(procedure);
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    pub fn all(&self) -> &[Procedure] {
        &self.procedures
    }

    /// All procedures of one airport.
    pub fn at_airport<'a>(&'a self, icao: &str) -> impl Iterator<Item = &'a Procedure> + 'a {
        self.by_airport
            .get(icao)
            .into_iter()
            .flatten()
            .map(|&idx| &self.procedures[idx])
    }

    /// All procedures at the airport whose name matches `token`, exactly or
    /// within spelling tolerance.
    ///
    /// Charts and filed plans disagree on procedure spelling by one letter
    /// often enough that the alphabetic prefix tolerates one substitution,
    /// insertion or deletion; the numeric/suffix component must match
    /// exactly (`SNTNA2` matches `SANTNA2` but not `SNTNA3`).
    pub fn find_matching<'a>(
        &'a self,
        icao: &str,
        kind: ProcedureKind,
        token: &str,
    ) -> Vec<&'a Procedure> {
        self.at_airport(icao)
            .filter(|p| p.kind == kind)
            .filter(|p| p.name == token || names_related(&p.name, token))
            .collect()
    }
}

impl Extend<Procedure> for ProcedureStore {
    fn extend<T: IntoIterator<Item = Procedure>>(&mut self, iter: T) {
        for procedure in iter {
            self.insert(procedure);
        }
    }
}

/// Splits a procedure identifier into its alphabetic prefix and the rest,
/// e.g. `ABBEY3A` → (`ABBEY`, `3A`).
fn split_components(ident: &str) -> (&str, &str) {
    let prefix_len = ident
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(ident.len());
    ident.split_at(prefix_len)
}

fn names_related(a: &str, b: &str) -> bool {
    let (prefix_a, suffix_a) = split_components(a);
    let (prefix_b, suffix_b) = split_components(b);

    suffix_a == suffix_b && prefix_within_one_edit(prefix_a.as_bytes(), prefix_b.as_bytes())
}

/// One substitution, insertion or deletion at most.
fn prefix_within_one_edit(a: &[u8], b: &[u8]) -> bool {
    match a.len() as i64 - b.len() as i64 {
        0 => a.iter().zip(b).filter(|(x, y)| x != y).count() <= 1,
        1 => one_deletion_of(b, a),
        -1 => one_deletion_of(a, b),
        _ => false,
    }
}

/// Whether `short` is `long` with exactly one character removed.
fn one_deletion_of(short: &[u8], long: &[u8]) -> bool {
    let mismatch = short
        .iter()
        .zip(long)
        .position(|(x, y)| x != y)
        .unwrap_or(short.len());
    short[mismatch..] == long[mismatch + 1..]
}
