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

//! Route parsing.
//!
//! A filed ICAO route is a whitespace separated list of tokens:
//!
//! ```text
//! TES61X/06 TESIG A470 DOTMI V512 ABBEY ABBEY3A/07R
//! ```
//!
//! reads as departure procedure `TES61X` off runway `06`, fix `TESIG`,
//! airway `A470` to `DOTMI`, airway `V512` to `ABBEY` and the arrival
//! procedure `ABBEY3A` onto runway `07R`. [`RouteParser`] turns such a
//! string into a [`ParsedRoute`]; everything that does not parse cleanly
//! becomes a [`ParsingError`] in it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod diagnostics;
mod parser;
mod sid_star;
mod token;
mod waypoint;

pub use diagnostics::{ParsingError, ParsingErrorKind, ParsingErrorLevel};
pub use parser::RouteParser;
pub use token::{parse_lat_lon, parse_planned_altitude_and_speed, LatLonParse};
pub use waypoint::{
    DistanceUnit, FlightRule, PlannedAltitudeAndSpeed, RouteWaypoint, SpeedUnit,
};

/// The airway name of a segment that connects two waypoints directly.
pub const DIRECT: &str = "DCT";

/// A connection between two consecutive route waypoints.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSegment {
    pub from: RouteWaypoint,
    pub to: RouteWaypoint,
    /// The airway flown between the two points, or [`DIRECT`].
    pub airway: String,
    /// Minimum crossing level of the airway segment in feet AMSL; `None`
    /// for direct connections.
    pub minimum_level: Option<u32>,
}

/// The result of parsing a route string.
///
/// Everything the parser learned ends up here: the waypoints in token
/// order, the segments connecting them, resolved procedures and runways,
/// and all diagnostics. A parse always yields a `ParsedRoute`; inspect
/// [`errors`](Self::errors) to judge how healthy the route is.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedRoute {
    /// The route string as filed, before cleanup.
    pub raw_route: String,
    pub waypoints: Vec<RouteWaypoint>,
    pub errors: Vec<ParsingError>,
    pub segments: Vec<RouteSegment>,
    /// Number of meaningful tokens, i.e. everything that was not filtered
    /// out as `DCT`, dots or the origin/destination ICAO.
    pub total_tokens: usize,
    pub departure_runway: Option<String>,
    pub arrival_runway: Option<String>,
    pub sid: Option<String>,
    pub star: Option<String>,
}

impl ParsedRoute {
    pub(crate) fn new(raw_route: &str) -> Self {
        Self {
            raw_route: raw_route.to_string(),
            ..Self::default()
        }
    }

    /// The errors of one severity.
    pub fn errors_at(&self, level: ParsingErrorLevel) -> impl Iterator<Item = &ParsingError> {
        self.errors.iter().filter(move |e| e.level == level)
    }

    /// Whether any Error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors_at(ParsingErrorLevel::Error).next().is_some()
    }
}
