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

//! Airway text file parsing.
//!
//! Each record is one tab-separated line:
//!
//! ```text
//! main_id  lat  lon  ?  airway  level  [neighbour1: id lat lon min_level Y/N]  [neighbour2: …]
//! ```
//!
//! A lone `N` in a neighbour slot means no neighbour in that position, the
//! minimum level `NESTB` means not published, and lines starting with `;` are
//! comments. Malformed lines are skipped rather than failing the whole load.

use log::debug;

use super::{AirwayLevel, AirwayNetwork};
use crate::error::{Error, Result};
use crate::geom::Coordinate;
use crate::nd::{Waypoint, WaypointKind};

struct Neighbour<'a> {
    ident: &'a str,
    coordinate: Coordinate,
    minimum_level: u32,
    can_traverse: bool,
}

/// Parses airway text file content into a finalized [`AirwayNetwork`].
///
/// Empty content yields an empty network; content in which not a single
/// record could be understood is rejected with [`Error::NoAirwayData`].
pub fn parse_airway_txt(content: &str) -> Result<AirwayNetwork> {
    let mut network = AirwayNetwork::new();
    let mut valid_data = false;

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(';') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        const MIN_FIELDS: usize = 7;
        if fields.len() < MIN_FIELDS {
            continue;
        }

        if fields[..6].iter().any(|f| f.is_empty()) {
            continue;
        }

        let Some(main_point) = parse_point(fields[1], fields[2]) else {
            debug!("skipping airway record with unparsable position: {line}");
            continue;
        };

        let main_ident = fields[0];
        let airway_name = fields[4];
        let level = AirwayLevel::from_char(fields[5].chars().next().unwrap_or('U'));

        let main_fix = || {
            Waypoint::new(
                WaypointKind::from_ident(main_ident),
                main_ident,
                main_point,
            )
        };

        let has_first = fields[6] != "N";
        if has_first && fields.len() > 10 {
            if let Some(neighbour) = parse_neighbour(&fields, 6) {
                network.add_segment(
                    airway_name,
                    level,
                    main_fix(),
                    neighbour_fix(&neighbour),
                    neighbour.minimum_level,
                    neighbour.can_traverse,
                );
            }
        }

        let next_start = if has_first { 11 } else { 7 };
        if fields.len() > next_start + 4 && fields[next_start] != "N" {
            if let Some(neighbour) = parse_neighbour(&fields, next_start) {
                network.add_segment(
                    airway_name,
                    level,
                    main_fix(),
                    neighbour_fix(&neighbour),
                    neighbour.minimum_level,
                    neighbour.can_traverse,
                );
            }
        }

        valid_data = true;
    }

    if !valid_data && !content.is_empty() {
        return Err(Error::NoAirwayData);
    }

    network.finalize();
    Ok(network)
}

fn neighbour_fix(neighbour: &Neighbour) -> Waypoint {
    Waypoint::new(
        WaypointKind::from_ident(neighbour.ident),
        neighbour.ident,
        neighbour.coordinate,
    )
}

fn parse_neighbour<'a>(fields: &[&'a str], start: usize) -> Option<Neighbour<'a>> {
    if fields.len() < start + 5 {
        return None;
    }

    let coordinate = parse_point(fields[start + 1], fields[start + 2])?;

    Some(Neighbour {
        ident: fields[start],
        coordinate,
        minimum_level: parse_level(fields[start + 3]).unwrap_or(0),
        can_traverse: fields[start + 4] == "Y",
    })
}

fn parse_point(lat: &str, lon: &str) -> Option<Coordinate> {
    let latitude = lat.trim().parse::<f64>().ok()?;
    let longitude = lon.trim().parse::<f64>().ok()?;
    Some(Coordinate::new(latitude, longitude))
}

/// `NESTB` means the minimum level is not published.
fn parse_level(level: &str) -> Option<u32> {
    if level == "NESTB" {
        return None;
    }
    level.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_segment() {
        let input = "ASPAT\t49.196175\t10.725828\t14\tT161\tL\t\
                     N\t\
                     DEBHI\t49.360833\t10.466111\t18000\tY\n";

        let network = parse_airway_txt(input).unwrap();
        let airways = network.airways_named("T161");
        assert_eq!(airways.len(), 1);
        assert_eq!(airways[0].level(), AirwayLevel::Low);

        let segments = airways[0].segments_between("ASPAT", "DEBHI").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].from.ident(), "ASPAT");
        assert_eq!(segments[0].to.ident(), "DEBHI");
        assert_eq!(segments[0].minimum_level, 18000);
        assert!(segments[0].can_traverse);
    }

    #[test]
    fn parses_both_neighbours() {
        let input = "BANSU\t14.286111\t108.159722\t14\tW11\tL\t\
                     PLK\t14.006039\t108.024406\t10000\tY\t\
                     TALAP\t14.415000\t108.221111\t10000\tY\n";

        let network = parse_airway_txt(input).unwrap();
        let airways = network.airways_with_fix("W11", "BANSU");
        assert_eq!(airways.len(), 1);
        assert!(airways[0].has_fix("PLK"));
        assert!(airways[0].has_fix("TALAP"));
    }

    #[test]
    fn chains_fixes_across_records() {
        let input = "ASPAT\t49.196175\t10.725828\t14\tT161\tL\t\
                     N\t\
                     DEBHI\t49.360833\t10.466111\t18000\tY\n\
                     DEBHI\t49.360833\t10.466111\t14\tT161\tL\t\
                     ASPAT\t49.196175\t10.725828\t18000\tY\t\
                     URSAL\t49.525000\t10.206944\t18000\tY\n";

        let network = parse_airway_txt(input).unwrap();
        let fixes = network
            .fixes_between(
                "T161",
                "ASPAT",
                "URSAL",
                &Coordinate::new(49.360833, 10.466111),
            )
            .unwrap();

        let idents: Vec<_> = fixes.iter().map(|f| f.ident()).collect();
        assert_eq!(idents, vec!["ASPAT", "DEBHI", "URSAL"]);
    }

    #[test]
    fn nestb_level_is_unrestricted() {
        let input = "ASPAT\t49.196175\t10.725828\t14\tT161\tL\t\
                     N\t\
                     DEBHI\t49.360833\t10.466111\tNESTB\tY\n";

        let network = parse_airway_txt(input).unwrap();
        let result = network.validate_traversal(
            "ASPAT",
            "T161",
            "DEBHI",
            1000,
            &Coordinate::new(49.196175, 10.725828),
        );

        assert!(result.is_valid);
        assert_eq!(result.segments[0].minimum_level, 0);
    }

    #[test]
    fn skips_comments_and_garbage() {
        let input = "; comment line\n\
                     \n\
                     garbage without tabs\n\
                     ASPAT\t49.196175\t10.725828\t14\tT161\tL\t\
                     N\t\
                     DEBHI\t49.360833\t10.466111\t18000\tY\n";

        let network = parse_airway_txt(input).unwrap();
        assert!(network.exists("T161"));
    }

    #[test]
    fn empty_content_is_an_empty_network() {
        let network = parse_airway_txt("").unwrap();
        assert!(network.names().is_empty());
    }

    #[test]
    fn all_garbage_is_rejected() {
        assert_eq!(
            parse_airway_txt("; only a comment\nnot a record\n"),
            Err(Error::NoAirwayData)
        );
    }
}
