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

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::Coordinate;
use crate::nd::{Waypoint, WaypointKind};

/// The flight rule in effect at a route point.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlightRule {
    Ifr,
    Vfr,
}

/// Unit of a planned altitude.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceUnit {
    Feet,
    Meters,
}

/// Unit of a planned speed.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedUnit {
    Knots,
    /// Mach number times one hundred, as filed (`M083` is Mach 0.83).
    Mach,
    Kmh,
}

/// The altitude and speed a pilot filed for a route point, e.g. the
/// `N0490F370` in `TESIG/N0490F370`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannedAltitudeAndSpeed {
    /// Altitude in full feet or meters.
    pub altitude: i32,
    pub altitude_unit: DistanceUnit,
    /// Speed in knots, km/h or hundredths of Mach.
    pub speed: i32,
    pub speed_unit: SpeedUnit,
}

/// A waypoint on a parsed route.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteWaypoint {
    waypoint: Waypoint,
    flight_rule: FlightRule,
    planned: Option<PlannedAltitudeAndSpeed>,
}

impl RouteWaypoint {
    pub fn new(waypoint: Waypoint, flight_rule: FlightRule) -> Self {
        Self {
            waypoint,
            flight_rule,
            planned: None,
        }
    }

    pub fn with_planned(
        waypoint: Waypoint,
        flight_rule: FlightRule,
        planned: Option<PlannedAltitudeAndSpeed>,
    ) -> Self {
        Self {
            waypoint,
            flight_rule,
            planned,
        }
    }

    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }

    pub fn ident(&self) -> &str {
        self.waypoint.ident()
    }

    pub fn kind(&self) -> WaypointKind {
        self.waypoint.kind()
    }

    pub fn coordinate(&self) -> Coordinate {
        self.waypoint.coordinate()
    }

    pub fn flight_rule(&self) -> FlightRule {
        self.flight_rule
    }

    pub fn planned(&self) -> Option<PlannedAltitudeAndSpeed> {
        self.planned
    }
}
