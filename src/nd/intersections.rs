// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Joe Pearson
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

//! Intersection file parsing.
//!
//! Tab-separated `identifier`, `latitude`, `longitude` in decimal degrees,
//! one intersection per line, comments starting with `;`. Lines that do not
//! parse are skipped.

use log::debug;

use super::{Waypoint, WaypointKind, Waypoints};
use crate::geom::Coordinate;

/// Parses intersection file content into waypoints.
///
/// The result feeds a [`FixedWaypointProvider`].
///
/// [`FixedWaypointProvider`]: super::FixedWaypointProvider
pub fn parse_intersections(content: &str) -> Waypoints {
    let mut waypoints = Vec::new();

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let mut fields = line.split('\t');
        let (Some(ident), Some(lat), Some(lon)) = (fields.next(), fields.next(), fields.next())
        else {
            debug!("skipping short intersection record: {line}");
            continue;
        };

        let (Ok(latitude), Ok(longitude)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>())
        else {
            debug!("skipping intersection record with unparsable position: {line}");
            continue;
        };

        waypoints.push(Waypoint::new(
            WaypointKind::from_ident(ident),
            ident,
            Coordinate::new(latitude, longitude),
        ));
    }

    waypoints
}
