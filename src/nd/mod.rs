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

//! Navigation Data.
//!
//! The [`Navdata`] registry answers "which physical point does this
//! identifier mean?" by consulting a priority-ordered list of
//! [`WaypointProvider`]s: in-memory sector data first, navaid databases
//! second, airway-derived fixes last. The first provider with a non-empty
//! answer wins; ambiguity among its matches is resolved by proximity to a
//! reference point.
//!
//! The registry is filled once at startup and read-only afterwards.

use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, error, warn};

mod intersections;
mod procedure;
mod provider;
mod sqlite;
mod waypoint;

pub use intersections::parse_intersections;
pub use procedure::{Procedure, ProcedureKind, ProcedureStore};
pub use provider::{priority, AirwayFixProvider, FixedWaypointProvider, WaypointProvider};
pub use sqlite::{airport_runway_idents, AirportDbProvider, AirwayDbProvider, NavaidDbProvider};
pub use waypoint::{Waypoint, WaypointKind, Waypoints};

use crate::geom::Coordinate;
use provider::closest_of;

type Provider = Box<dyn WaypointProvider + Send + Sync>;

/// The waypoint registry.
pub struct Navdata {
    providers: Vec<Provider>,
    cache: Option<Mutex<HashMap<String, Waypoints>>>,
}

impl Default for Navdata {
    fn default() -> Self {
        Self::new()
    }
}

impl Navdata {
    /// Creates a registry with the lookup cache enabled.
    pub fn new() -> Self {
        Self::with_cache(true)
    }

    /// Creates a registry, optionally without the lookup cache.
    pub fn with_cache(enable_cache: bool) -> Self {
        Self {
            providers: Vec::new(),
            cache: enable_cache.then(|| Mutex::new(HashMap::new())),
        }
    }

    /// Initializes a provider and adds it to the registry.
    ///
    /// Returns `false` and drops the provider if its initialization fails.
    /// Providers are kept sorted by priority, lower numbers first.
    pub fn add_provider(&mut self, mut provider: Provider) -> bool {
        if !provider.initialize() {
            warn!("failed to initialize waypoint provider: {}", provider.name());
            return false;
        }

        debug!(
            "initialized waypoint provider {} (priority {})",
            provider.name(),
            provider.priority()
        );

        self.providers.push(provider);
        self.providers.sort_by_key(|p| p.priority());
        true
    }

    pub fn is_initialized(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Seeds the lookup cache, e.g. with waypoints resolved in an earlier
    /// session. No effect when the cache is disabled.
    pub fn seed_cache(&self, entries: HashMap<String, Waypoints>) {
        if let Some(cache) = &self.cache {
            let mut cache = match cache.lock() {
                Ok(cache) => cache,
                Err(poisoned) => poisoned.into_inner(),
            };
            *cache = entries;
        }
    }

    /// Returns all waypoints matching the identifier.
    ///
    /// Providers are consulted in priority order and the first non-empty
    /// answer wins. Results are cached per identifier.
    pub fn find_all(&self, ident: &str) -> Waypoints {
        if self.providers.is_empty() {
            error!("waypoint lookup with no initialized providers");
            return Vec::new();
        }

        if ident.is_empty() {
            error!("empty waypoint identifier provided");
            return Vec::new();
        }

        if let Some(cache) = &self.cache {
            let cache = match cache.lock() {
                Ok(cache) => cache,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(hit) = cache.get(ident) {
                debug!("found {} waypoints for '{}' in cache", hit.len(), ident);
                return hit.clone();
            }
        }

        for provider in &self.providers {
            if !provider.is_initialized() {
                warn!("skipping uninitialized provider: {}", provider.name());
                continue;
            }

            let found = provider.find_all(ident);
            if !found.is_empty() {
                debug!(
                    "provider '{}' found {} waypoints for '{}'",
                    provider.name(),
                    found.len(),
                    ident
                );

                if let Some(cache) = &self.cache {
                    let mut cache = match cache.lock() {
                        Ok(cache) => cache,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    cache.insert(ident.to_string(), found.clone());
                }

                return found;
            }
        }

        Vec::new()
    }

    /// Returns the first match for the identifier.
    pub fn find_first(&self, ident: &str) -> Option<Waypoint> {
        self.find_all(ident).into_iter().next()
    }

    /// Returns the match closest to the reference point. Ties are broken by
    /// insertion order of the matches.
    pub fn find_closest(&self, ident: &str, reference: &Coordinate) -> Option<Waypoint> {
        closest_of(self.find_all(ident), reference)
    }

    /// Returns the match closest to a reference waypoint.
    ///
    /// Without a reference the position of the first match serves as one, so
    /// a single match always succeeds.
    pub fn find_closest_to(&self, ident: &str, reference: Option<&Waypoint>) -> Option<Waypoint> {
        let candidates = self.find_all(ident);

        let reference = match reference {
            Some(waypoint) => waypoint.coordinate(),
            None => candidates.first()?.coordinate(),
        };

        closest_of(candidates, &reference)
    }

    /// Returns the first match of the wanted kind.
    pub fn find_by_kind(&self, ident: &str, kind: WaypointKind) -> Option<Waypoint> {
        self.find_all(ident).into_iter().find(|w| w.kind() == kind)
    }

    /// Returns the known waypoint closest to `near`, or a synthetic fix at
    /// that position if the identifier is unknown.
    ///
    /// Airway ingestion uses this to intern the fixes it reads: known points
    /// keep their dataset identity, unknown ones are created from the file's
    /// own coordinates.
    pub fn find_or_create(&self, ident: &str, near: Coordinate) -> Waypoint {
        self.find_closest(ident, &near)
            .unwrap_or_else(|| Waypoint::new(WaypointKind::from_ident(ident), ident, near))
    }
}
