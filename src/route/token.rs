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

//! Token shape recognition.
//!
//! Pure predicates and parsers over single route tokens. None of them
//! consult navigation data; whether `DOTMI` is a real fix or `A470` a real
//! airway is decided by the state machine with the datasets at hand. Many
//! token shapes overlap, so the order in which the state machine tries these
//! matters — not the order here.

use std::sync::LazyLock;

use regex::Regex;

use super::waypoint::{DistanceUnit, FlightRule, PlannedAltitudeAndSpeed, SpeedUnit};
use crate::geom::Coordinate;

/// Speed and altitude as filed, e.g. `N0490F370`, `M083F360` or
/// `K0880S1130`.
static PLANNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((M)(\d{3})|([NK])(\d{4}))(([FA])(\d{3})|([SM])(\d{4}))$").unwrap()
});

/// Coordinate literal, degrees with optional minutes: `5220N03305E` or
/// `57N020W`.
static LATLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{0,2})([NS])(\d{3})(\d{0,2})([EW])$").unwrap());

/// Normalizes a raw route string.
///
/// Some clients file with `:` between elements; treat it as whitespace and
/// collapse runs so the tokenizer sees single-space separation.
pub(crate) fn cleanup_raw_route(raw: &str) -> String {
    raw.to_uppercase()
        .replace(':', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a token carries no routing information of its own.
///
/// Empty and dot tokens, the `DCT` literal and the origin/destination ICAO
/// are dropped before classification and do not count as meaningful tokens.
pub(crate) fn is_filtered(token: &str, origin: &str, destination: &str) -> bool {
    matches!(token, "" | "." | ".." | "DCT") || token == origin || token == destination
}

pub(crate) fn parse_flight_rule(token: &str) -> Option<FlightRule> {
    match token {
        "IFR" => Some(FlightRule::Ifr),
        "VFR" => Some(FlightRule::Vfr),
        _ => None,
    }
}

/// Parses a planned altitude/speed group.
///
/// Speeds: `N####` knots, `K####` km/h, `M###` Mach times one hundred.
/// Altitudes: `F###`/`A###` hundreds of feet, `S####`/`M####` tens of
/// meters; both are scaled to full feet or meters.
pub fn parse_planned_altitude_and_speed(token: &str) -> Option<PlannedAltitudeAndSpeed> {
    let captures = PLANNED.captures(token)?;

    let group = |i: usize| captures.get(i).map(|m| m.as_str());
    let number = |i: usize| group(i).and_then(|s| s.parse::<i32>().ok());

    // Mach speeds match groups 2/3, knots and km/h groups 4/5; the same
    // split applies to the altitude alternatives.
    let (speed_unit, speed) = match group(2) {
        Some(unit) => (unit, number(3)?),
        None => (group(4)?, number(5)?),
    };
    let (altitude_unit, altitude) = match group(7) {
        Some(unit) => (unit, number(8)?),
        None => (group(9)?, number(10)?),
    };

    let speed_unit = match speed_unit {
        "M" => SpeedUnit::Mach,
        "K" => SpeedUnit::Kmh,
        _ => SpeedUnit::Knots,
    };

    let (altitude_unit, altitude) = match altitude_unit {
        "S" | "M" => (DistanceUnit::Meters, altitude * 10),
        _ => (DistanceUnit::Feet, altitude * 100),
    };

    Some(PlannedAltitudeAndSpeed {
        altitude,
        altitude_unit,
        speed,
        speed_unit,
    })
}

/// Result of matching a token against the coordinate literal shape.
#[derive(Clone, PartialEq, Debug)]
pub enum LatLonParse {
    /// The token is not a coordinate literal at all.
    NotLatLon,
    /// The shape matches but the degrees are out of range.
    OutOfRange,
    Valid(Coordinate),
}

/// Parses a coordinate literal like `5220N03305E` or `57N020W`.
pub fn parse_lat_lon(token: &str) -> LatLonParse {
    let Some(captures) = LATLON.captures(token) else {
        return LatLonParse::NotLatLon;
    };

    let number = |i: usize| {
        captures
            .get(i)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<u32>().ok())
    };

    let (Some(lat_degrees), Some(lon_degrees)) = (number(1), number(4)) else {
        return LatLonParse::NotLatLon;
    };

    if lat_degrees > 90 || lon_degrees > 180 {
        return LatLonParse::OutOfRange;
    }

    let mut latitude = f64::from(lat_degrees) + f64::from(number(2).unwrap_or(0)) / 60.0;
    let mut longitude = f64::from(lon_degrees) + f64::from(number(5).unwrap_or(0)) / 60.0;

    if captures.get(3).map(|m| m.as_str()) == Some("S") {
        latitude = -latitude;
    }
    if captures.get(6).map(|m| m.as_str()) == Some("W") {
        longitude = -longitude;
    }

    LatLonParse::Valid(Coordinate::new(latitude, longitude))
}

/// Extracts the runway part of a `PROC/RWY` token.
///
/// Airway names never contain `/`, so a slash splits a procedure or anchor
/// candidate from a two or three character runway designator.
pub(crate) fn runway_designator(token: &str) -> Option<&str> {
    let (_, right) = token.split_once('/')?;
    (right.len() == 2 || right.len() == 3).then_some(right)
}
