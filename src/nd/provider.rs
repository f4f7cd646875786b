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

use log::{debug, error, info};

use super::{Waypoint, Waypoints};
use crate::airway::AirwayNetwork;
use crate::geom::Coordinate;

/// Canonical provider priorities. Lower wins.
pub mod priority {
    pub const NSE: i32 = 1;
    pub const NAVDATA: i32 = 2;
    pub const AIRWAY: i32 = 3;
}

/// A source of waypoints, searched by identifier.
///
/// Providers are owned by the [`Navdata`] registry which consults them in
/// priority order. They must be idempotent under initialization and report
/// their own readiness; the registry skips providers that are not ready.
///
/// [`Navdata`]: super::Navdata
pub trait WaypointProvider {
    /// Returns all waypoints matching the identifier.
    fn find_all(&self, ident: &str) -> Waypoints;

    /// Returns the match closest to the reference point.
    fn find_closest(&self, ident: &str, reference: &Coordinate) -> Option<Waypoint> {
        let candidates = self.find_all(ident);
        closest_of(candidates, reference)
    }

    /// Prepares the provider for lookups. Returns `false` if the provider
    /// cannot be used, e.g. because its backing database failed to open.
    fn initialize(&mut self) -> bool;

    fn is_initialized(&self) -> bool;

    fn name(&self) -> &str;

    fn priority(&self) -> i32;
}

/// Picks the waypoint closest to `reference`, ties broken by insertion order.
pub(crate) fn closest_of(candidates: Waypoints, reference: &Coordinate) -> Option<Waypoint> {
    let mut min_dist = f64::MAX;
    let mut closest = None;

    for waypoint in candidates {
        let dist = reference.dist_km(&waypoint.coordinate());
        if dist < min_dist {
            min_dist = dist;
            closest = Some(waypoint);
        }
    }

    closest
}

/// In-memory waypoint provider.
///
/// Serves a fixed set of waypoints handed over at construction, e.g. the
/// waypoints of a sector file. By default it registers at the highest
/// priority.
pub struct FixedWaypointProvider {
    by_ident: HashMap<String, Waypoints>,
    name: String,
    priority: i32,
    initialized: bool,
}

impl FixedWaypointProvider {
    pub fn new(waypoints: Waypoints, name: impl Into<String>) -> Self {
        Self::with_priority(waypoints, name, priority::NSE)
    }

    pub fn with_priority(waypoints: Waypoints, name: impl Into<String>, priority: i32) -> Self {
        let mut by_ident: HashMap<String, Waypoints> = HashMap::new();
        for waypoint in waypoints {
            by_ident
                .entry(waypoint.ident().to_string())
                .or_default()
                .push(waypoint);
        }

        let name = name.into();
        info!(
            "[{}] constructed with {} unique waypoint identifiers (priority {})",
            name,
            by_ident.len(),
            priority
        );

        Self {
            by_ident,
            name,
            priority,
            initialized: false,
        }
    }
}

impl WaypointProvider for FixedWaypointProvider {
    fn find_all(&self, ident: &str) -> Waypoints {
        if !self.is_initialized() {
            error!("[{}] lookup on uninitialized provider", self.name);
            return Vec::new();
        }

        if ident.is_empty() {
            error!("[{}] empty waypoint identifier provided", self.name);
            return Vec::new();
        }

        match self.by_ident.get(ident) {
            Some(waypoints) => {
                debug!(
                    "[{}] found {} waypoints for identifier '{}'",
                    self.name,
                    waypoints.len(),
                    ident
                );
                waypoints.clone()
            }
            None => Vec::new(),
        }
    }

    fn initialize(&mut self) -> bool {
        self.initialized = true;
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Waypoint provider backed by the fixes of an [`AirwayNetwork`].
///
/// Airway files carry coordinates for every fix they reference, so a loaded
/// network doubles as a last-resort waypoint source. Registers at the lowest
/// canonical priority.
pub struct AirwayFixProvider {
    inner: FixedWaypointProvider,
}

impl AirwayFixProvider {
    pub fn new(network: &AirwayNetwork, name: impl Into<String>) -> Self {
        let mut by_ident: HashMap<String, Waypoints> = HashMap::new();
        for airway in network.airways() {
            for fix in airway.fixes() {
                let namesakes = by_ident.entry(fix.ident().to_string()).or_default();
                if !namesakes.contains(fix) {
                    namesakes.push(fix.clone());
                }
            }
        }

        let fixes = by_ident.into_values().flatten().collect();
        Self {
            inner: FixedWaypointProvider::with_priority(fixes, name, priority::AIRWAY),
        }
    }
}

impl WaypointProvider for AirwayFixProvider {
    fn find_all(&self, ident: &str) -> Waypoints {
        self.inner.find_all(ident)
    }

    fn initialize(&mut self) -> bool {
        self.inner.initialize()
    }

    fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn priority(&self) -> i32 {
        self.inner.priority()
    }
}
