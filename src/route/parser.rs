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

//! The route state machine.
//!
//! [`RouteParser::parse`] classifies each token of a filed route in a strict
//! order; the first classification that accepts a token consumes it:
//!
//! 1. flight-rule switch (`IFR`/`VFR`)
//! 2. planned altitude/speed on the first meaningful token
//! 3. SID/STAR with runway, strict (dataset or anchor ICAO matches only)
//! 4. airway with a look-ahead at its terminator fix
//! 5. waypoint identifier, resolved by proximity to the previous point
//! 6. lat/lon literal
//! 7. SID/STAR retry without the dataset requirement
//! 8. otherwise: unknown waypoint
//!
//! Airways come before waypoints because most airway designators would pass
//! as waypoint identifiers; the strict procedure attempt comes early so a
//! known procedure is never misread as an unknown waypoint, and the soft
//! retry comes last so an unknown procedure can still fill the runway slot.
//!
//! The machine always runs to completion. Whatever goes wrong along the way
//! ends up as diagnostics in the returned [`ParsedRoute`].

use log::{debug, trace};

use super::diagnostics::{push_unique, ParsingError, ParsingErrorKind, ParsingErrorLevel};
use super::sid_star::{self, FoundProcedure};
use super::token::{self, LatLonParse};
use super::waypoint::{FlightRule, PlannedAltitudeAndSpeed, RouteWaypoint};
use super::{ParsedRoute, RouteSegment, DIRECT};
use crate::airway::AirwayNetwork;
use crate::nd::{Navdata, ProcedureKind, ProcedureStore, Waypoint, WaypointKind};

/// Flight level passed to airway validation while parsing: the route lists
/// the airway anyway, so extract its segments regardless of any filed level.
const PERMISSIVE_FLIGHT_LEVEL: u32 = 99_999;

/// Parses raw route strings against read-only navigation stores.
///
/// The parser borrows its stores, keeps no state between calls and may be
/// used from several threads at once.
pub struct RouteParser<'a> {
    navdata: &'a Navdata,
    airways: &'a AirwayNetwork,
    procedures: &'a ProcedureStore,
}

impl<'a> RouteParser<'a> {
    pub fn new(
        navdata: &'a Navdata,
        airways: &'a AirwayNetwork,
        procedures: &'a ProcedureStore,
    ) -> Self {
        Self {
            navdata,
            airways,
            procedures,
        }
    }

    /// Parses a raw route string into a [`ParsedRoute`].
    ///
    /// `origin` and `destination` are the ICAO codes the plan was filed
    /// with; they anchor SID/STAR resolution and are dropped from the token
    /// stream. The default flight rule applies until a rule switch token
    /// changes it.
    pub fn parse(
        &self,
        raw_route: &str,
        origin: &str,
        destination: &str,
        default_rule: FlightRule,
    ) -> ParsedRoute {
        let mut parsed = ParsedRoute::new(raw_route);

        let route = token::cleanup_raw_route(raw_route);
        if route.is_empty() {
            parsed.errors.push(ParsingError::new(
                ParsingErrorKind::RouteEmpty,
                "Route is empty",
                0,
                "",
                ParsingErrorLevel::Error,
            ));
            return parsed;
        }

        debug!("parsing route {route:?} ({origin} -> {destination})");

        let tokens: Vec<&str> = route.split(' ').collect();
        let meaningful: Vec<bool> = tokens
            .iter()
            .map(|t| !token::is_filtered(t, origin, destination))
            .collect();

        parsed.total_tokens = meaningful.iter().filter(|&&m| m).count();
        let first_meaningful = meaningful.iter().position(|&m| m);
        let last_meaningful = meaningful.iter().rposition(|&m| m);

        let mut previous_waypoint = self.navdata.find_by_kind(origin, WaypointKind::Airport);
        let mut current_rule = default_rule;

        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if !meaningful[i] {
                i += 1;
                continue;
            }

            let is_first = Some(i) == first_meaningful;
            let is_last = Some(i) == last_meaningful;
            let anchor = if is_first { origin } else { destination };

            if let Some(rule) = token::parse_flight_rule(token) {
                trace!("flight rule switches to {rule:?} at token {i}");
                current_rule = rule;
                i += 1;
                continue;
            }

            // A leading speed/level group describes the whole flight; the
            // per-waypoint groups hang off waypoint tokens instead.
            if is_first && token::parse_planned_altitude_and_speed(token).is_some() {
                i += 1;
                continue;
            }

            if (is_first || is_last)
                && token.contains('/')
                && self.parse_procedure(&mut parsed, i, token, anchor, is_first, true, current_rule)
            {
                i += 1;
                continue;
            }

            let is_airway = self.airways.exists(token);

            if is_airway && !token.contains('/') {
                if let (Some(previous), Some(&next_token)) =
                    (previous_waypoint.clone(), tokens.get(i + 1))
                {
                    if !next_token.contains('/') {
                        if let Some(terminator) =
                            self.parse_airway(&mut parsed, i, token, &previous, next_token, current_rule)
                        {
                            previous_waypoint = Some(terminator);
                            // the look-ahead consumed the terminator too
                            i += 2;
                            continue;
                        }
                    }
                }
            }

            if !is_airway
                && self.parse_waypoint(&mut parsed, i, token, &mut previous_waypoint, current_rule)
            {
                i += 1;
                continue;
            }

            if !is_airway
                && self.parse_lat_lon(&mut parsed, i, token, &mut previous_waypoint, current_rule)
            {
                i += 1;
                continue;
            }

            if (is_first || is_last)
                && self.parse_procedure(&mut parsed, i, token, anchor, is_first, false, current_rule)
            {
                i += 1;
                continue;
            }

            if !is_airway {
                push_unique(
                    &mut parsed.errors,
                    ParsingError::new(
                        ParsingErrorKind::UnknownWaypoint,
                        "Unknown waypoint",
                        i,
                        token,
                        ParsingErrorLevel::Error,
                    ),
                );
            }

            i += 1;
        }

        debug!(
            "route parsed: {} waypoints, {} errors",
            parsed.waypoints.len(),
            parsed.errors.len()
        );

        parsed
    }

    /// Tries a token as SID (`is_first`) or STAR against the anchor airport.
    ///
    /// In strict mode only a procedure present in the dataset, or the anchor
    /// ICAO itself with a runway, is accepted; strict also suppresses the
    /// unknown-procedure diagnostic since the soft retry will raise it
    /// definitively.
    #[allow(clippy::too_many_arguments)]
    fn parse_procedure(
        &self,
        parsed: &mut ParsedRoute,
        index: usize,
        token: &str,
        anchor_icao: &str,
        is_first: bool,
        strict: bool,
        current_rule: FlightRule,
    ) -> bool {
        let kind = if is_first {
            ProcedureKind::Sid
        } else {
            ProcedureKind::Star
        };

        let found: FoundProcedure =
            sid_star::find_procedure(self.procedures, token, anchor_icao, kind, index);

        for error in &found.errors {
            if strict && error.kind == ParsingErrorKind::UnknownProcedure {
                continue;
            }
            push_unique(&mut parsed.errors, error.clone());
        }

        if found.procedure.is_none() && found.runway.is_none() && found.extracted.is_none() {
            return false;
        }

        // The anchor ICAO next to a runway only picks the runway.
        if found.procedure.as_deref() == Some(anchor_icao) && found.runway.is_some() {
            if is_first {
                parsed.departure_runway = found.runway;
            } else {
                parsed.arrival_runway = found.runway;
            }
            return true;
        }

        if strict && found.extracted.is_none() {
            return false;
        }

        if is_first {
            parsed.departure_runway = found.runway.clone();
            parsed.sid = found.procedure.clone();
        } else {
            parsed.arrival_runway = found.runway.clone();
            parsed.star = found.procedure.clone();
        }

        if let Some(procedure) = &found.extracted {
            for waypoint in &procedure.waypoints {
                Self::push_direct(parsed, RouteWaypoint::new(waypoint.clone(), current_rule));
            }
            return true;
        }

        !strict && (found.procedure.is_some() || found.runway.is_some())
    }

    /// Expands `previous → airway → terminator` into route waypoints.
    ///
    /// Returns the terminator waypoint when both tokens were consumed; the
    /// caller advances past the terminator and continues from it.
    fn parse_airway(
        &self,
        parsed: &mut ParsedRoute,
        index: usize,
        token: &str,
        previous: &Waypoint,
        next_token: &str,
        current_rule: FlightRule,
    ) -> Option<Waypoint> {
        // the terminator must resolve to a waypoint for the airway reading
        let terminator = self.navdata.find_closest_to(next_token, Some(previous))?;

        let result = self.airways.validate_traversal(
            previous.ident(),
            token,
            next_token,
            PERMISSIVE_FLIGHT_LEVEL,
            &previous.coordinate(),
        );

        for error in result.errors {
            let mut error = error;
            error.token_index = index;
            error.token = token.to_string();
            error.level = ParsingErrorLevel::Error;
            push_unique(&mut parsed.errors, error);
        }

        if result.segments.is_empty() {
            // keep the terminator so the route continues past the bad airway
            Self::push_direct(parsed, RouteWaypoint::new(terminator.clone(), current_rule));
            return Some(terminator);
        }

        let last = result.segments.len() - 1;
        for (n, segment) in result.segments.iter().enumerate() {
            // the terminator keeps its dataset identity, intermediate fixes
            // come from the airway itself
            let to = if n == last {
                terminator.clone()
            } else {
                segment.to.clone()
            };

            let from = RouteWaypoint::new(segment.from.clone(), current_rule);
            let to = RouteWaypoint::new(to, current_rule);

            parsed.segments.push(RouteSegment {
                from,
                to: to.clone(),
                airway: token.to_string(),
                minimum_level: Some(segment.minimum_level),
            });
            parsed.waypoints.push(to);
        }

        Some(terminator)
    }

    /// Tries a token as a waypoint identifier with an optional planned
    /// altitude/speed group attached after a slash.
    fn parse_waypoint(
        &self,
        parsed: &mut ParsedRoute,
        index: usize,
        token: &str,
        previous: &mut Option<Waypoint>,
        current_rule: FlightRule,
    ) -> bool {
        let (ident, planned_part) = match token.split_once('/') {
            Some((ident, planned)) => (ident, Some(planned)),
            None => (token, None),
        };

        let Some(waypoint) = self.navdata.find_closest_to(ident, previous.as_ref()) else {
            return false;
        };

        let planned = Self::parse_planned_part(parsed, index, token, planned_part);

        Self::push_direct(
            parsed,
            RouteWaypoint::with_planned(waypoint.clone(), current_rule, planned),
        );
        *previous = Some(waypoint);
        true
    }

    /// Tries a token as a lat/lon literal like `5220N03305E`.
    fn parse_lat_lon(
        &self,
        parsed: &mut ParsedRoute,
        index: usize,
        token: &str,
        previous: &mut Option<Waypoint>,
        current_rule: FlightRule,
    ) -> bool {
        let (literal, planned_part) = match token.split_once('/') {
            Some((literal, planned)) => (literal, Some(planned)),
            None => (token, None),
        };

        let coordinate = match token::parse_lat_lon(literal) {
            LatLonParse::NotLatLon => return false,
            LatLonParse::OutOfRange => {
                push_unique(
                    &mut parsed.errors,
                    ParsingError::new(
                        ParsingErrorKind::InvalidData,
                        "Invalid lat/lon coordinate",
                        index,
                        literal,
                        ParsingErrorLevel::Error,
                    ),
                );
                return false;
            }
            LatLonParse::Valid(coordinate) => coordinate,
        };

        // the waypoint keeps the original literal as its identifier
        let waypoint = Waypoint::new(WaypointKind::LatLon, literal, coordinate);
        let planned = Self::parse_planned_part(parsed, index, token, planned_part);

        Self::push_direct(
            parsed,
            RouteWaypoint::with_planned(waypoint.clone(), current_rule, planned),
        );
        *previous = Some(waypoint);
        true
    }

    /// Parses the planned altitude/speed behind a waypoint's slash and
    /// reports a malformed group without failing the waypoint itself.
    fn parse_planned_part(
        parsed: &mut ParsedRoute,
        index: usize,
        token: &str,
        planned_part: Option<&str>,
    ) -> Option<PlannedAltitudeAndSpeed> {
        let part = planned_part?;
        let planned = token::parse_planned_altitude_and_speed(part);

        if planned.is_none() {
            push_unique(
                &mut parsed.errors,
                ParsingError::new(
                    ParsingErrorKind::InvalidData,
                    "Invalid planned TAS and Altitude, ignoring it.",
                    index,
                    token,
                    ParsingErrorLevel::Error,
                ),
            );
        }

        planned
    }

    /// Appends a waypoint connected directly to its predecessor.
    fn push_direct(parsed: &mut ParsedRoute, waypoint: RouteWaypoint) {
        if let Some(last) = parsed.waypoints.last() {
            parsed.segments.push(RouteSegment {
                from: last.clone(),
                to: waypoint.clone(),
                airway: DIRECT.to_string(),
                minimum_level: None,
            });
        }
        parsed.waypoints.push(waypoint);
    }
}
