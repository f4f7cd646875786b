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

//! End-to-end route parsing against data bootstrapped the way an embedding
//! application would: intersections and airways from their text formats,
//! airports from SQLite, procedures handed over directly.

use routeparse::airway::{parse_airway_txt, AirwayNetwork};
use routeparse::geom::Coordinate;
use routeparse::nd::{
    parse_intersections, AirportDbProvider, AirwayFixProvider, FixedWaypointProvider, Navdata,
    Procedure, ProcedureKind, ProcedureStore, Waypoint, WaypointKind,
};
use routeparse::route::{
    FlightRule, ParsedRoute, ParsingErrorKind, ParsingErrorLevel, RouteParser, DIRECT,
};

const INTERSECTIONS: &str = "\
; enroute fixes
TESIG\t31.893333\t118.806389
SOPAH\t31.000000\t117.500000
DOTMI\t30.000000\t116.000000
ABBEY\t22.383333\t114.333333
PAINT\t37.200000\t-121.900000
KMAE\t36.900000\t-120.100000
";

const AIRWAYS: &str = "\
; A470 Nanjing segment, one-way TESIG -> SOPAH -> DOTMI
TESIG\t31.893333\t118.806389\t14\tA470\tL\t\
N\t\
SOPAH\t31.000000\t117.500000\t9000\tY
SOPAH\t31.000000\t117.500000\t14\tA470\tL\t\
TESIG\t31.893333\t118.806389\t9000\tN\t\
DOTMI\t30.000000\t116.000000\t9000\tY
";

/// The Y6 fixture from the airway validator: bidirectional between SUMUM,
/// TOSVA and IDESI at minimum level 10500, one-way IDESI -> BANEM above.
const Y6_AIRWAYS: &str = "\
IDESI\t51.897706\t1.885578\t14\tY6\tB\t\
BANEM\t52.335556\t1.505278\t16500\tY\t\
TOSVA\t51.677056\t2.073983\t10500\tN
TOSVA\t51.677056\t2.073983\t14\tY6\tB\t\
IDESI\t51.897706\t1.885578\t10500\tY\t\
SUMUM\t51.637281\t2.107706\t10500\tN
BANEM\t52.335556\t1.505278\t14\tY6\tB\t\
N\t\
IDESI\t51.897706\t1.885578\t16500\tN
SUMUM\t51.637281\t2.107706\t14\tY6\tB\t\
TOSVA\t51.677056\t2.073983\t10500\tY\t\
N
";

fn airports_db() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static NEXT: AtomicUsize = AtomicUsize::new(0);

    // tests run in parallel, every world gets its own database file
    let path = std::env::temp_dir().join(format!(
        "routeparse-airports-{}-{}.db",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_file(&path);

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE airports (
             ident TEXT, name TEXT, type TEXT,
             latitude_deg REAL, longitude_deg REAL,
             elevation_ft INTEGER, iso_country TEXT, iso_region TEXT
         );
         INSERT INTO airports VALUES
             ('ZSNJ', 'Nanjing Lukou', 'large_airport', 31.741944, 118.861944, 49, 'CN', 'CN-32'),
             ('VHHH', 'Hong Kong Intl', 'large_airport', 22.308889, 113.914444, 28, 'HK', 'HK-U-A'),
             ('KSFO', 'San Francisco Intl', 'large_airport', 37.618889, -122.375, 13, 'US', 'US-CA'),
             ('KLAX', 'Los Angeles Intl', 'large_airport', 33.9425, -118.408056, 125, 'US', 'US-CA');",
    )
    .unwrap();

    path
}

fn procedures() -> ProcedureStore {
    let fix = |ident: &str, lat: f64, lon: f64| {
        Waypoint::new(WaypointKind::Fix, ident, Coordinate::new(lat, lon))
    };

    let mut store = ProcedureStore::new();
    store.insert(Procedure {
        name: "SNTNA2".to_string(),
        airport_icao: "KSFO".to_string(),
        runway: "28L".to_string(),
        kind: ProcedureKind::Sid,
        waypoints: vec![fix("SEPDY", 37.5, -122.2)],
    });
    store.insert(Procedure {
        name: "KAYAK3".to_string(),
        airport_icao: "KLAX".to_string(),
        runway: "24R".to_string(),
        kind: ProcedureKind::Star,
        waypoints: vec![fix("KAYAK", 34.5, -117.9)],
    });
    store
}

struct World {
    navdata: Navdata,
    airways: AirwayNetwork,
    procedures: ProcedureStore,
}

impl World {
    fn new(airways: AirwayNetwork) -> Self {
        let mut navdata = Navdata::new();
        assert!(navdata.add_provider(Box::new(FixedWaypointProvider::new(
            parse_intersections(INTERSECTIONS),
            "Intersections",
        ))));
        assert!(navdata.add_provider(Box::new(AirportDbProvider::new(
            airports_db(),
            "Airports DB",
        ))));
        assert!(navdata.add_provider(Box::new(AirwayFixProvider::new(&airways, "Airway fixes"))));

        Self {
            navdata,
            airways,
            procedures: procedures(),
        }
    }

    fn with_airways() -> Self {
        Self::new(parse_airway_txt(AIRWAYS).unwrap())
    }

    fn without_airways() -> Self {
        Self::new(AirwayNetwork::new())
    }

    fn parse(&self, route: &str, origin: &str, destination: &str) -> ParsedRoute {
        RouteParser::new(&self.navdata, &self.airways, &self.procedures).parse(
            route,
            origin,
            destination,
            FlightRule::Ifr,
        )
    }
}

fn count_kind(parsed: &ParsedRoute, kind: ParsingErrorKind) -> usize {
    parsed.errors.iter().filter(|e| e.kind == kind).count()
}

fn idents(parsed: &ParsedRoute) -> Vec<&str> {
    parsed.waypoints.iter().map(|w| w.ident()).collect()
}

#[test]
fn sid_and_star_resolve_from_dataset() {
    let world = World::with_airways();
    let parsed = world.parse("KSFO SNTNA2 PAINT KMAE KAYAK3 KLAX", "KSFO", "KLAX");

    assert_eq!(parsed.sid.as_deref(), Some("SNTNA2"));
    assert_eq!(parsed.star.as_deref(), Some("KAYAK3"));
    assert!(idents(&parsed).contains(&"PAINT"));
    assert!(idents(&parsed).contains(&"KMAE"));
    assert_eq!(parsed.errors_at(ParsingErrorLevel::Error).count(), 0);
}

#[test]
fn colons_read_like_spaces() {
    let world = World::with_airways();
    let parsed = world.parse("KSFO:SNTNA2:PAINT  KMAE   KAYAK3:KLAX", "KSFO", "KLAX");

    assert_eq!(parsed.sid.as_deref(), Some("SNTNA2"));
    assert_eq!(parsed.star.as_deref(), Some("KAYAK3"));
    assert_eq!(parsed.errors_at(ParsingErrorLevel::Error).count(), 0);
}

#[test]
fn unknown_procedures_fill_slots_and_unknown_tokens_report() {
    // Neither TES61X nor ABBEY3A is in the dataset, and without airway data
    // A470 and V512 read as unknown waypoints.
    let world = World::without_airways();
    let parsed = world.parse(
        "TES61X/06 TESIG A470 DOTMI V512 ABBEY ABBEY3A/07R",
        "ZSNJ",
        "VHHH",
    );

    assert_eq!(parsed.sid.as_deref(), Some("TES61X"));
    assert_eq!(parsed.departure_runway.as_deref(), Some("06"));
    assert_eq!(parsed.star.as_deref(), Some("ABBEY3A"));
    assert_eq!(parsed.arrival_runway.as_deref(), Some("07R"));

    assert_eq!(parsed.total_tokens, 7);
    assert_eq!(idents(&parsed), vec!["TESIG", "DOTMI", "ABBEY"]);

    assert_eq!(count_kind(&parsed, ParsingErrorKind::UnknownProcedure), 2);
    assert_eq!(
        parsed.errors_at(ParsingErrorLevel::Info).count(),
        2,
        "strict attempts must not double-report the unknown procedures"
    );
    assert_eq!(count_kind(&parsed, ParsingErrorKind::UnknownWaypoint), 2);
}

#[test]
fn unresolvable_token_is_an_unknown_waypoint_error() {
    let world = World::without_airways();
    let parsed = world.parse("KSFO SID1 INVALID_WPT STAR1 KLAX", "KSFO", "KLAX");

    assert!(parsed
        .errors
        .iter()
        .any(|e| e.kind == ParsingErrorKind::UnknownWaypoint
            && e.level == ParsingErrorLevel::Error));
}

#[test]
fn airway_between_fixes_expands_to_its_segments() {
    let world = World::with_airways();
    let parsed = world.parse("TESIG A470 DOTMI", "ZSNJ", "VHHH");

    assert_eq!(idents(&parsed), vec!["TESIG", "SOPAH", "DOTMI"]);
    assert_eq!(parsed.errors_at(ParsingErrorLevel::Error).count(), 0);

    let airway_segments: Vec<_> = parsed
        .segments
        .iter()
        .filter(|s| s.airway == "A470")
        .collect();
    assert_eq!(airway_segments.len(), 2);
    assert_eq!(airway_segments[0].minimum_level, Some(9000));

    // chained segments stay connected
    for pair in parsed.segments.windows(2) {
        assert_eq!(pair[0].to.ident(), pair[1].from.ident());
    }
}

#[test]
fn dct_never_reaches_the_output() {
    let world = World::with_airways();
    let parsed = world.parse("TESIG DCT DOTMI DCT ABBEY", "ZSNJ", "VHHH");

    assert_eq!(idents(&parsed), vec!["TESIG", "DOTMI", "ABBEY"]);
    assert_eq!(parsed.total_tokens, 3);
    assert!(parsed.waypoints.iter().all(|w| w.ident() != DIRECT));
    assert!(parsed.segments.iter().all(|s| s.airway == DIRECT));
}

#[test]
fn flight_rule_tracks_the_most_recent_switch() {
    let world = World::with_airways();
    let parsed = world.parse("TESIG VFR DOTMI IFR ABBEY", "ZSNJ", "VHHH");

    let rules: Vec<_> = parsed.waypoints.iter().map(|w| w.flight_rule()).collect();
    assert_eq!(
        rules,
        vec![FlightRule::Ifr, FlightRule::Vfr, FlightRule::Ifr]
    );
}

#[test]
fn empty_route_reports_route_empty() {
    let world = World::without_airways();
    for route in ["", "   ", "\t"] {
        let parsed = world.parse(route, "KSFO", "KLAX");
        assert!(parsed.waypoints.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].kind, ParsingErrorKind::RouteEmpty);
    }
}

#[test]
fn traversal_validation_distinguishes_its_failure_modes() {
    let network = parse_airway_txt(Y6_AIRWAYS).unwrap();
    let near = Coordinate::new(51.677056, 2.073983);

    // at FL110 the bidirectional legs at 10500 pass
    let result = network.validate_traversal("SUMUM", "Y6", "IDESI", 11000, &near);
    assert!(result.is_valid);
    assert_eq!(result.segments.len(), 2);
    assert_eq!(result.segments[0].from.ident(), "SUMUM");
    assert_eq!(result.segments[0].to.ident(), "TOSVA");
    assert_eq!(result.segments[1].to.ident(), "IDESI");
    assert!(result.segments.iter().all(|s| s.minimum_level == 10500));
    assert!(result
        .segments
        .iter()
        .all(|s| s.minimum_level <= 11000 && s.can_traverse));

    // at FL100 the same path is too low
    let result = network.validate_traversal("SUMUM", "Y6", "IDESI", 10000, &near);
    assert!(!result.is_valid);
    assert_eq!(
        result.errors[0].kind,
        ParsingErrorKind::InsufficientFlightLevel
    );
    assert!(result.errors[0].message.contains("10500"));

    // and backwards the one-way legs block the path
    let result = network.validate_traversal("IDESI", "Y6", "SUMUM", 20000, &near);
    assert!(!result.is_valid);
    assert_eq!(
        result.errors[0].kind,
        ParsingErrorKind::InvalidAirwayDirection
    );
}
