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

//! Active runway configuration per airport.
//!
//! A controller keeps the currently active departure and arrival runways of
//! each airport here; the parser's consumers combine them with a parsed
//! route to pick the best fitting SID or STAR. Updates replace the whole
//! snapshot under a single writer lock, so readers on other threads always
//! see a consistent configuration.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::nd::{Procedure, ProcedureKind, ProcedureStore};

/// The active runway sets of one airport.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ActiveRunways {
    pub departure: Vec<String>,
    pub arrival: Vec<String>,
}

/// Active-runway bookkeeping and best-procedure selection.
#[derive(Debug, Default)]
pub struct AirportConfigurator {
    runways: Mutex<HashMap<String, ActiveRunways>>,
}

impl AirportConfigurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active runway snapshot for all airports.
    pub fn update_runways(&self, runways: HashMap<String, ActiveRunways>) {
        let mut guard = match self.runways.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = runways;
    }

    /// The active departure runways of an airport.
    pub fn departure_runways(&self, icao: &str) -> Vec<String> {
        let guard = match self.runways.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .get(icao)
            .map(|r| r.departure.clone())
            .unwrap_or_default()
    }

    /// The active arrival runways of an airport.
    pub fn arrival_runways(&self, icao: &str) -> Vec<String> {
        let guard = match self.runways.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .get(icao)
            .map(|r| r.arrival.clone())
            .unwrap_or_default()
    }

    /// Picks the best SID for a departure whose first enroute waypoint is
    /// known.
    ///
    /// The first procedure serving an active departure runway that contains
    /// the first route waypoint wins. With no such procedure the first
    /// active runway is returned without one; with no active runways at all
    /// or an empty route there is nothing to pick.
    pub fn find_best_sid(
        &self,
        icao: &str,
        route_waypoints: &[String],
        procedures: &ProcedureStore,
    ) -> Option<(String, Option<Procedure>)> {
        let first = route_waypoints.first()?;
        let active = self.departure_runways(icao);
        self.find_best(icao, ProcedureKind::Sid, first, active, procedures)
    }

    /// Picks the best STAR for an arrival whose last enroute waypoint is
    /// known. The counterpart of [`find_best_sid`](Self::find_best_sid).
    pub fn find_best_star(
        &self,
        icao: &str,
        route_waypoints: &[String],
        procedures: &ProcedureStore,
    ) -> Option<(String, Option<Procedure>)> {
        let last = route_waypoints.last()?;
        let active = self.arrival_runways(icao);
        self.find_best(icao, ProcedureKind::Star, last, active, procedures)
    }

    fn find_best(
        &self,
        icao: &str,
        kind: ProcedureKind,
        connecting_waypoint: &str,
        active: Vec<String>,
        procedures: &ProcedureStore,
    ) -> Option<(String, Option<Procedure>)> {
        if active.is_empty() {
            return None;
        }

        let active_set: HashSet<&str> = active.iter().map(String::as_str).collect();

        for procedure in procedures.at_airport(icao) {
            if procedure.kind != kind || !active_set.contains(procedure.runway.as_str()) {
                continue;
            }

            if procedure
                .waypoints
                .iter()
                .any(|w| w.ident() == connecting_waypoint)
            {
                return Some((procedure.runway.clone(), Some(procedure.clone())));
            }
        }

        Some((active[0].clone(), None))
    }
}
