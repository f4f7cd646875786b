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

//! Parser and validator for ICAO flight plan route strings.
//!
//! A filed route like
//!
//! ```text
//! TES61X/06 TESIG A470 DOTMI V512 ABBEY ABBEY3A/07R
//! ```
//!
//! is turned into a [`ParsedRoute`]: an ordered list of waypoints with
//! per-point flight rule and planned altitude/speed, the resolved departure
//! and arrival procedure with runway, explicit airway traversal segments with
//! minimum flight levels, and a list of diagnostics tagged with the token
//! position that produced them.
//!
//! The parser itself never fails; every problem with the route string becomes
//! a [`ParsingError`] inside the returned [`ParsedRoute`]. The navigation
//! data it parses against is built once at startup from any combination of
//! in-memory waypoint lists, SQLite databases and airway/intersection text
//! files, and is read-only afterwards.
//!
//! ```no_run
//! use routeparse::airway::AirwayNetwork;
//! use routeparse::nd::{Navdata, ProcedureStore};
//! use routeparse::route::{FlightRule, RouteParser};
//!
//! # fn parse(navdata: Navdata, airways: AirwayNetwork, procedures: ProcedureStore) {
//! let parser = RouteParser::new(&navdata, &airways, &procedures);
//! let parsed = parser.parse(
//!     "TES61X/06 TESIG A470 DOTMI V512 ABBEY ABBEY3A/07R",
//!     "ZSNJ",
//!     "VHHH",
//!     FlightRule::Ifr,
//! );
//!
//! for error in &parsed.errors {
//!     println!("{}: {}", error.token, error.message);
//! }
//! # }
//! ```
//!
//! [`ParsedRoute`]: route::ParsedRoute
//! [`ParsingError`]: route::ParsingError

pub mod airport;
pub mod airway;
pub mod error;
pub mod geom;
pub mod nd;
pub mod route;

pub use error::{Error, Result};

/// Commonly used types re-exported in one place.
pub mod prelude {
    pub use crate::airport::{ActiveRunways, AirportConfigurator};
    pub use crate::airway::{AirwayLevel, AirwayNetwork, AirwaySegmentInfo};
    pub use crate::error::{Error, Result};
    pub use crate::geom::Coordinate;
    pub use crate::nd::{
        Navdata, Procedure, ProcedureKind, ProcedureStore, Waypoint, WaypointKind,
        WaypointProvider,
    };
    pub use crate::route::{
        FlightRule, ParsedRoute, ParsingError, ParsingErrorKind, ParsingErrorLevel, RouteParser,
        RouteWaypoint,
    };
}
