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

//! Airways as directed graphs over fixes.
//!
//! An airway file yields an [`AirwayNetwork`]: a name-keyed collection of
//! [`Airway`] graphs. The same designator may appear several times for
//! geographically disjoint airways; lookups that need a single airway resolve
//! the ambiguity by proximity to a reference point.
//!
//! The network answers the central question of route validation through
//! [`AirwayNetwork::validate_traversal`]: can a flight go from fix A to fix B
//! along airway X at flight level L, and over which segments?

use std::collections::HashMap;

use log::warn;

use crate::geom::Coordinate;
use crate::nd::Waypoint;
use crate::route::{ParsingError, ParsingErrorKind, ParsingErrorLevel};

mod graph;
mod parser;

pub use graph::{Airway, AirwayLevel, AirwaySegmentInfo, TraversalError};
pub use parser::parse_airway_txt;

/// Outcome of an airway traversal or route validation.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TraversalResult {
    pub is_valid: bool,
    pub errors: Vec<ParsingError>,
    pub segments: Vec<AirwaySegmentInfo>,
}

impl TraversalResult {
    fn failure(kind: ParsingErrorKind, message: String) -> Self {
        Self {
            is_valid: false,
            errors: vec![ParsingError::new(
                kind,
                message,
                0,
                "",
                ParsingErrorLevel::Error,
            )],
            segments: Vec::new(),
        }
    }

    fn success(segments: Vec<AirwaySegmentInfo>) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            segments,
        }
    }
}

/// All airways known to the parser, keyed by name.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct AirwayNetwork {
    airways: HashMap<String, Vec<Airway>>,
}

impl AirwayNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the airway `name`, creating the airway on first
    /// contact.
    ///
    /// When several airways share the name, the segment goes to the one that
    /// already contains one of the two fixes; otherwise a new airway is
    /// started. This is what keeps geographically disjoint namesakes apart.
    pub fn add_segment(
        &mut self,
        name: &str,
        level: AirwayLevel,
        from: Waypoint,
        to: Waypoint,
        minimum_level: u32,
        can_traverse: bool,
    ) {
        let namesakes = self.airways.entry(name.to_string()).or_default();

        let airway = match namesakes
            .iter_mut()
            .find(|a| a.has_fix(from.ident()) || a.has_fix(to.ident()))
        {
            Some(airway) => airway,
            None => {
                namesakes.push(Airway::new(name, level));
                namesakes.last_mut().expect("airway was just pushed")
            }
        };

        airway.add_segment(from, to, minimum_level, can_traverse);
    }

    /// Computes the display order of every airway. Called once after bulk
    /// loading.
    pub fn finalize(&mut self) {
        for airway in self.airways.values_mut().flatten() {
            airway.finalize();
        }
    }

    /// Whether any airway with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.airways.contains_key(name)
    }

    /// All airways, in no particular order.
    pub fn airways(&self) -> impl Iterator<Item = &Airway> {
        self.airways.values().flatten()
    }

    /// All airways sharing `name`.
    pub fn airways_named(&self, name: &str) -> &[Airway] {
        self.airways.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All airways sharing `name` that contain the fix.
    pub fn airways_with_fix(&self, name: &str, fix_ident: &str) -> Vec<&Airway> {
        self.airways_named(name)
            .iter()
            .filter(|a| a.has_fix(fix_ident))
            .collect()
    }

    /// The distinct airway names in the network.
    pub fn names(&self) -> Vec<&str> {
        self.airways.keys().map(String::as_str).collect()
    }

    /// Of all airways sharing `name`, the one with a member fix closest to
    /// `point`.
    pub fn find_nearest(&self, name: &str, point: &Coordinate) -> Option<&Airway> {
        let mut nearest = None;
        let mut min_dist = f64::MAX;

        for airway in self.airways_named(name) {
            for fix in airway.fixes() {
                let dist = fix.coordinate().dist_km(point);
                if dist < min_dist {
                    min_dist = dist;
                    nearest = Some(airway);
                }
            }
        }

        nearest
    }

    /// Path segments along the nearest airway `name` from one fix to another.
    pub fn segments_between(
        &self,
        name: &str,
        from: &str,
        to: &str,
        near: &Coordinate,
    ) -> Result<Vec<AirwaySegmentInfo>, TraversalError> {
        let airway = self
            .find_nearest(name, near)
            .ok_or(TraversalError::AirwayNotFound)?;
        airway.segments_between(from, to)
    }

    /// The fix chain along the nearest airway `name`, start and terminator
    /// included.
    pub fn fixes_between(
        &self,
        name: &str,
        from: &str,
        to: &str,
        near: &Coordinate,
    ) -> Result<Vec<Waypoint>, TraversalError> {
        let segments = self.segments_between(name, from, to, near)?;

        let mut fixes = Vec::with_capacity(segments.len() + 1);
        if let Some(first) = segments.first() {
            fixes.push(first.from.clone());
        }
        for segment in &segments {
            fixes.push(segment.to.clone());
        }

        Ok(fixes)
    }

    /// Validates that `start_fix` → `end_fix` can be flown along the airway
    /// `name` at `flight_level` (feet AMSL).
    ///
    /// Namesake airways containing both fixes are tried nearest-first to
    /// `near`, grouped by level class in order of first appearance so that
    /// the geographically closer class is preferred. The first candidate
    /// whose traversable path stays within the filed level wins. When all
    /// candidates fail, the diagnostics collected along the way are returned
    /// with the most specific kind first.
    pub fn validate_traversal(
        &self,
        start_fix: &str,
        name: &str,
        end_fix: &str,
        flight_level: u32,
        near: &Coordinate,
    ) -> TraversalResult {
        let namesakes = self.airways_named(name);
        if namesakes.is_empty() {
            return TraversalResult::failure(
                ParsingErrorKind::UnknownAirway,
                format!("Airway not found: {name}"),
            );
        }

        // Candidates must contain both fixes; sort them by the distance of
        // their closest member fix to the reference point.
        let mut candidates: Vec<(&Airway, f64)> = namesakes
            .iter()
            .filter(|a| a.has_fix(start_fix) && a.has_fix(end_fix))
            .map(|a| {
                let min_dist = a
                    .fixes()
                    .iter()
                    .map(|fix| fix.coordinate().dist_km(near))
                    .fold(f64::MAX, f64::min);
                (a, min_dist)
            })
            .collect();

        if candidates.is_empty() {
            return TraversalResult::failure(
                ParsingErrorKind::AirwayFixNotFound,
                format!("No airway {name} contains both {start_fix} and {end_fix}"),
            );
        }

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        // Group by level class, classes ordered by their closest candidate.
        let mut groups: Vec<(AirwayLevel, Vec<&Airway>)> = Vec::new();
        for &(airway, _) in &candidates {
            match groups.iter_mut().find(|(level, _)| *level == airway.level()) {
                Some((_, group)) => group.push(airway),
                None => groups.push((airway.level(), vec![airway])),
            }
        }

        let mut errors = Vec::new();

        for (level, group) in groups {
            for airway in group {
                let segments = match airway.segments_between(start_fix, end_fix) {
                    Ok(segments) => segments,
                    Err(TraversalError::InvalidDirection) => {
                        errors.push(ParsingError::new(
                            ParsingErrorKind::InvalidAirwayDirection,
                            format!("Cannot traverse {level} airway in this direction"),
                            0,
                            "",
                            ParsingErrorLevel::Info,
                        ));
                        continue;
                    }
                    Err(_) => continue,
                };

                if segments.is_empty() {
                    continue;
                }

                let max_required = segments
                    .iter()
                    .filter(|s| s.minimum_level > flight_level)
                    .map(|s| s.minimum_level)
                    .max();

                match max_required {
                    None => return TraversalResult::success(segments),
                    Some(required) => errors.push(ParsingError::new(
                        ParsingErrorKind::InsufficientFlightLevel,
                        format!("{level} airway requires FL{required}"),
                        0,
                        "",
                        ParsingErrorLevel::Info,
                    )),
                }
            }
        }

        if errors.is_empty() {
            errors.push(ParsingError::new(
                ParsingErrorKind::InvalidAirwayDirection,
                format!("No valid route found between fixes on {name}"),
                0,
                "",
                ParsingErrorLevel::Error,
            ));
        } else {
            // The most specific diagnostic leads; bare direction failures are
            // the least informative.
            errors.sort_by_key(|e| e.kind == ParsingErrorKind::InvalidAirwayDirection);
        }

        TraversalResult {
            is_valid: false,
            errors,
            segments: Vec::new(),
        }
    }

    /// Validates a `FIX AIRWAY FIX AIRWAY FIX …` route expression.
    ///
    /// The expression is split into fix/airway/fix triples which are walked
    /// left to right, carrying the end of each validated leg as the
    /// reference point for selecting among namesake airways of the next.
    pub fn validate_route(&self, route: &str) -> TraversalResult {
        let mut triples = Vec::new();
        let mut prev_fix: Option<&str> = None;
        let mut current_airway: Option<&str> = None;

        for token in route.split_whitespace() {
            match (prev_fix, current_airway) {
                (None, _) => prev_fix = Some(token),
                (Some(_), None) => current_airway = Some(token),
                (Some(from), Some(airway)) => {
                    triples.push((from, airway, token));
                    prev_fix = Some(token);
                    current_airway = None;
                }
            }
        }

        if let Some(airway) = current_airway {
            return TraversalResult::failure(
                ParsingErrorKind::InvalidAirwayFormat,
                format!("Route string ends with airway identifier: {airway}"),
            );
        }

        let Some(&(start_fix, _, _)) = triples.first() else {
            return TraversalResult::failure(
                ParsingErrorKind::InvalidAirwayFormat,
                "Route contains no airway segments".to_string(),
            );
        };

        let Some(start_point) = self.airways().find_map(|airway| {
            airway
                .fixes()
                .iter()
                .find(|fix| fix.ident() == start_fix)
                .map(|fix| fix.coordinate())
        }) else {
            return TraversalResult::failure(
                ParsingErrorKind::AirwayFixNotFound,
                format!("Could not find starting fix: {start_fix}"),
            );
        };

        let mut validated = Vec::new();
        let mut current_point = start_point;

        for (from, airway_name, to) in triples {
            let Some(airway) = self.find_nearest(airway_name, &current_point) else {
                return TraversalResult::failure(
                    ParsingErrorKind::UnknownAirway,
                    format!("Could not find airway: {airway_name}"),
                );
            };

            match airway.segments_between(from, to) {
                Ok(segments) => {
                    if let Some(last) = segments.last() {
                        current_point = last.to.coordinate();
                    }
                    validated.extend(segments);
                }
                Err(TraversalError::InvalidDirection) => {
                    return TraversalResult::failure(
                        ParsingErrorKind::InvalidAirwayDirection,
                        format!("Cannot traverse airway {airway_name} from {from} to {to}"),
                    );
                }
                Err(err) => {
                    warn!("validation of {from} {airway_name} {to} failed: {err}");
                    return TraversalResult::failure(
                        ParsingErrorKind::AirwayFixNotFound,
                        format!("Fix not found in airway {airway_name}"),
                    );
                }
            }
        }

        TraversalResult::success(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nd::WaypointKind;

    fn fix(ident: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(WaypointKind::Fix, ident, Coordinate::new(lat, lon))
    }

    /// The Y6 fixture: BANEM ◀─ IDESI ◀─▶ TOSVA ◀─▶ SUMUM with one-way
    /// IDESI → BANEM and bidirectional legs at minimum level 10500 below.
    fn y6_network() -> AirwayNetwork {
        let idesi = || fix("IDESI", 51.897706, 1.885578);
        let tosva = || fix("TOSVA", 51.677056, 2.073983);
        let banem = || fix("BANEM", 52.335556, 1.505278);
        let sumum = || fix("SUMUM", 51.637281, 2.107706);

        let mut network = AirwayNetwork::new();
        network.add_segment("Y6", AirwayLevel::Both, idesi(), banem(), 16500, true);
        network.add_segment("Y6", AirwayLevel::Both, idesi(), tosva(), 10500, false);
        network.add_segment("Y6", AirwayLevel::Both, tosva(), idesi(), 10500, true);
        network.add_segment("Y6", AirwayLevel::Both, tosva(), sumum(), 10500, false);
        network.add_segment("Y6", AirwayLevel::Both, banem(), idesi(), 16500, false);
        network.add_segment("Y6", AirwayLevel::Both, sumum(), tosva(), 10500, true);
        network.finalize();
        network
    }

    #[test]
    fn sufficient_level_passes() {
        let network = y6_network();
        let result = network.validate_traversal(
            "SUMUM",
            "Y6",
            "IDESI",
            11000,
            &Coordinate::new(51.677056, 2.073983),
        );

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].from.ident(), "SUMUM");
        assert_eq!(result.segments[0].to.ident(), "TOSVA");
        assert_eq!(result.segments[0].minimum_level, 10500);
        assert_eq!(result.segments[1].from.ident(), "TOSVA");
        assert_eq!(result.segments[1].to.ident(), "IDESI");
        assert_eq!(result.segments[1].minimum_level, 10500);
    }

    #[test]
    fn insufficient_level_names_the_requirement() {
        let network = y6_network();
        let result = network.validate_traversal(
            "SUMUM",
            "Y6",
            "IDESI",
            10000,
            &Coordinate::new(51.677056, 2.073983),
        );

        assert!(!result.is_valid);
        assert_eq!(
            result.errors[0].kind,
            ParsingErrorKind::InsufficientFlightLevel
        );
        assert!(result.errors[0].message.contains("10500"));
    }

    #[test]
    fn wrong_direction_is_reported() {
        let network = y6_network();
        let result = network.validate_traversal(
            "IDESI",
            "Y6",
            "SUMUM",
            20000,
            &Coordinate::new(51.677056, 2.073983),
        );

        assert!(!result.is_valid);
        assert_eq!(
            result.errors[0].kind,
            ParsingErrorKind::InvalidAirwayDirection
        );
    }

    #[test]
    fn unknown_airway_and_unknown_fix_are_distinguished() {
        let network = y6_network();

        let result =
            network.validate_traversal("SUMUM", "Z99", "IDESI", 11000, &Coordinate::default());
        assert_eq!(result.errors[0].kind, ParsingErrorKind::UnknownAirway);

        let result =
            network.validate_traversal("SUMUM", "Y6", "LOGAN", 11000, &Coordinate::default());
        assert_eq!(result.errors[0].kind, ParsingErrorKind::AirwayFixNotFound);
    }

    #[test]
    fn namesakes_stay_separate_and_resolve_by_proximity() {
        // Two disjoint airways both called A1, one in Europe, one near
        // Australia.
        let mut network = AirwayNetwork::new();
        network.add_segment(
            "A1",
            AirwayLevel::Both,
            fix("NORTA", 50.0, 8.0),
            fix("NORTB", 50.5, 8.5),
            5000,
            true,
        );
        network.add_segment(
            "A1",
            AirwayLevel::Both,
            fix("SOUTA", -33.0, 151.0),
            fix("SOUTB", -33.5, 151.5),
            5000,
            true,
        );
        network.finalize();

        assert_eq!(network.airways_named("A1").len(), 2);

        let nearest = network
            .find_nearest("A1", &Coordinate::new(-34.0, 151.0))
            .unwrap();
        assert!(nearest.has_fix("SOUTA"));
    }

    #[test]
    fn validate_route_walks_triples() {
        let network = y6_network();
        let result = network.validate_route("SUMUM Y6 IDESI");

        assert!(result.is_valid);
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[1].to.ident(), "IDESI");
    }

    #[test]
    fn validate_route_rejects_dangling_airway() {
        let network = y6_network();
        let result = network.validate_route("SUMUM Y6 IDESI Y6");

        assert!(!result.is_valid);
        assert_eq!(result.errors[0].kind, ParsingErrorKind::InvalidAirwayFormat);
    }

    #[test]
    fn validate_route_reports_unknown_start() {
        let network = y6_network();
        let result = network.validate_route("LOGAN Y6 IDESI");

        assert!(!result.is_valid);
        assert_eq!(result.errors[0].kind, ParsingErrorKind::AirwayFixNotFound);
    }

    #[test]
    fn validate_route_direction_error_names_the_leg() {
        let network = y6_network();
        let result = network.validate_route("BANEM Y6 SUMUM");

        assert!(!result.is_valid);
        assert_eq!(
            result.errors[0].kind,
            ParsingErrorKind::InvalidAirwayDirection
        );
        assert_eq!(
            result.errors[0].message,
            "Cannot traverse airway Y6 from BANEM to SUMUM"
        );
    }
}
