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

pub type Waypoints = Vec<Waypoint>;

/// The kind of a navigation point.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaypointKind {
    Fix,
    Vor,
    Dme,
    Tacan,
    Ndb,
    Airport,
    /// A point constructed from a coordinate literal in a route string. The
    /// identifier keeps the original token, e.g. `5220N03305E`.
    LatLon,
}

impl WaypointKind {
    /// Classifies an identifier by its shape.
    ///
    /// Five uppercase letters name a fix, three a VOR and one or two an NDB.
    /// The shape is advisory only; the datasets have the final word on what
    /// an identifier actually is.
    pub fn from_ident(ident: &str) -> Self {
        if ident.chars().all(|c| c.is_ascii_uppercase()) {
            match ident.len() {
                5 => return Self::Fix,
                3 => return Self::Vor,
                1 | 2 => return Self::Ndb,
                _ => (),
            }
        }
        Self::Fix
    }

    /// Maps a navaid type string as found in navaid databases, e.g. `VOR-DME`
    /// or `TACAN`.
    pub fn from_navaid_type(navaid_type: &str) -> Self {
        let t = navaid_type.to_ascii_uppercase();
        if t.contains("TAC") {
            Self::Tacan
        } else if t.starts_with("VOR") {
            Self::Vor
        } else if t.starts_with("NDB") {
            Self::Ndb
        } else if t.starts_with("DME") {
            Self::Dme
        } else {
            Self::Fix
        }
    }
}

/// A named geographic point used for navigation.
///
/// Two waypoints are equal iff identifier and position match exactly. The
/// identifier alone is not unique; many places worldwide may share `BLUE`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    kind: WaypointKind,
    ident: String,
    coordinate: Coordinate,
    frequency_hz: Option<u32>,
}

impl Waypoint {
    pub fn new(kind: WaypointKind, ident: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            kind,
            ident: ident.into(),
            coordinate,
            frequency_hz: None,
        }
    }

    /// Creates a waypoint with a navaid frequency in Hz.
    pub fn with_frequency(
        kind: WaypointKind,
        ident: impl Into<String>,
        coordinate: Coordinate,
        frequency_hz: u32,
    ) -> Self {
        Self {
            kind,
            ident: ident.into(),
            coordinate,
            frequency_hz: Some(frequency_hz),
        }
    }

    pub fn kind(&self) -> WaypointKind {
        self.kind
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn frequency_hz(&self) -> Option<u32> {
        self.frequency_hz
    }

    /// Returns the great-circle distance to the `other` waypoint in
    /// kilometers.
    pub fn dist_km(&self, other: &Waypoint) -> f64 {
        self.coordinate.dist_km(&other.coordinate)
    }
}
