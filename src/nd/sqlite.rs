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

//! SQLite-backed waypoint providers.
//!
//! All databases are opened read-only and their schema is validated before
//! the provider reports itself ready. Query failures are logged and turn
//! into empty results; they never escape a lookup.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, error};
use rusqlite::{Connection, OpenFlags};

use super::provider::{priority, WaypointProvider};
use super::{Waypoint, WaypointKind, Waypoints};
use crate::error::{Error, Result};
use crate::geom::Coordinate;

fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Checks that `table` exists with all `columns`.
fn validate_schema(conn: &Connection, table: &'static str, columns: &[&'static str]) -> Result<()> {
    let mut table_check =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    if !table_check.exists([table])? {
        return Err(Error::MissingTable { table });
    }

    let mut column_check = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let found: Vec<String> = column_check
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<_, _>>()?;

    for &column in columns {
        if !found.iter().any(|c| c == column) {
            return Err(Error::MissingColumn { table, column });
        }
    }

    Ok(())
}

/// Waypoint provider over a `navaids` database.
///
/// Consumes the schema `navaids(ident, type, frequency_khz, latitude_deg,
/// longitude_deg, …)`. Registers at the middle canonical priority.
pub struct NavaidDbProvider {
    conn: Option<Mutex<Connection>>,
    path: PathBuf,
    name: String,
    priority: i32,
}

impl NavaidDbProvider {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            conn: None,
            path: path.into(),
            name: name.into(),
            priority: priority::NAVDATA,
        }
    }
}

impl WaypointProvider for NavaidDbProvider {
    fn find_all(&self, ident: &str) -> Waypoints {
        let Some(conn) = &self.conn else {
            error!("[{}] lookup on uninitialized database", self.name);
            return Vec::new();
        };

        if ident.is_empty() {
            error!("[{}] empty waypoint identifier provided", self.name);
            return Vec::new();
        }

        let conn = match conn.lock() {
            Ok(conn) => conn,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = conn
            .prepare_cached(
                "SELECT ident, type, frequency_khz, latitude_deg, longitude_deg \
                 FROM navaids WHERE ident = ?1",
            )
            .and_then(|mut stmt| {
                stmt.query_map([ident], |row| {
                    let id: String = row.get(0)?;
                    let navaid_type: String = row.get(1)?;
                    let frequency_khz: Option<u32> = row.get(2)?;
                    let latitude: Option<f64> = row.get(3)?;
                    let longitude: Option<f64> = row.get(4)?;

                    let coordinate =
                        Coordinate::new(latitude.unwrap_or(0.0), longitude.unwrap_or(0.0));
                    Ok(match frequency_khz {
                        Some(khz) => Waypoint::with_frequency(
                            WaypointKind::from_navaid_type(&navaid_type),
                            id,
                            coordinate,
                            khz * 1000,
                        ),
                        None => Waypoint::new(
                            WaypointKind::from_navaid_type(&navaid_type),
                            id,
                            coordinate,
                        ),
                    })
                })?
                .collect::<std::result::Result<Waypoints, _>>()
            });

        match result {
            Ok(waypoints) => {
                if !waypoints.is_empty() {
                    debug!(
                        "[{}] found {} waypoints for identifier '{}'",
                        self.name,
                        waypoints.len(),
                        ident
                    );
                }
                waypoints
            }
            Err(e) => {
                error!("[{}] error querying waypoint {}: {}", self.name, ident, e);
                Vec::new()
            }
        }
    }

    fn initialize(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }

        let conn = match open_read_only(&self.path) {
            Ok(conn) => conn,
            Err(e) => {
                error!("[{}] error opening database: {}", self.name, e);
                return false;
            }
        };

        if let Err(e) = validate_schema(
            &conn,
            "navaids",
            &["ident", "type", "frequency_khz", "latitude_deg", "longitude_deg"],
        ) {
            error!("[{}] database validation failed: {}", self.name, e);
            return false;
        }

        self.conn = Some(Mutex::new(conn));
        true
    }

    fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Waypoint provider over an airway database's `waypoints` table.
///
/// Consumes the schema `waypoints(identifier, latitude, longitude)`. The
/// waypoint kind is derived from the identifier shape. Registers at the
/// lowest canonical priority.
pub struct AirwayDbProvider {
    conn: Option<Mutex<Connection>>,
    path: PathBuf,
    name: String,
    priority: i32,
}

impl AirwayDbProvider {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            conn: None,
            path: path.into(),
            name: name.into(),
            priority: priority::AIRWAY,
        }
    }
}

impl WaypointProvider for AirwayDbProvider {
    fn find_all(&self, ident: &str) -> Waypoints {
        let Some(conn) = &self.conn else {
            error!("[{}] lookup on uninitialized database", self.name);
            return Vec::new();
        };

        if ident.is_empty() {
            error!("[{}] empty waypoint identifier provided", self.name);
            return Vec::new();
        }

        let conn = match conn.lock() {
            Ok(conn) => conn,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = conn
            .prepare_cached(
                "SELECT identifier, latitude, longitude FROM waypoints WHERE identifier = ?1",
            )
            .and_then(|mut stmt| {
                stmt.query_map([ident], |row| {
                    let id: String = row.get(0)?;
                    let latitude: Option<f64> = row.get(1)?;
                    let longitude: Option<f64> = row.get(2)?;

                    Ok(Waypoint::new(
                        WaypointKind::from_ident(&id),
                        id,
                        Coordinate::new(latitude.unwrap_or(0.0), longitude.unwrap_or(0.0)),
                    ))
                })?
                .collect::<std::result::Result<Waypoints, _>>()
            });

        match result {
            Ok(waypoints) => waypoints,
            Err(e) => {
                error!("[{}] error querying waypoint {}: {}", self.name, ident, e);
                Vec::new()
            }
        }
    }

    fn initialize(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }

        let conn = match open_read_only(&self.path) {
            Ok(conn) => conn,
            Err(e) => {
                error!("[{}] error opening database: {}", self.name, e);
                return false;
            }
        };

        if let Err(e) = validate_schema(&conn, "waypoints", &["identifier", "latitude", "longitude"])
        {
            error!("[{}] database validation failed: {}", self.name, e);
            return false;
        }

        self.conn = Some(Mutex::new(conn));
        true
    }

    fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Waypoint provider over an `airports` database.
///
/// Consumes the schema `airports(ident, name, type, latitude_deg,
/// longitude_deg, …)` and serves every airport as a waypoint of kind
/// [`WaypointKind::Airport`].
pub struct AirportDbProvider {
    conn: Option<Mutex<Connection>>,
    path: PathBuf,
    name: String,
    priority: i32,
}

impl AirportDbProvider {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            conn: None,
            path: path.into(),
            name: name.into(),
            priority: priority::NAVDATA,
        }
    }
}

impl WaypointProvider for AirportDbProvider {
    fn find_all(&self, ident: &str) -> Waypoints {
        let Some(conn) = &self.conn else {
            error!("[{}] lookup on uninitialized database", self.name);
            return Vec::new();
        };

        if ident.is_empty() {
            error!("[{}] empty waypoint identifier provided", self.name);
            return Vec::new();
        }

        let conn = match conn.lock() {
            Ok(conn) => conn,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = conn
            .prepare_cached(
                "SELECT ident, latitude_deg, longitude_deg FROM airports WHERE ident = ?1",
            )
            .and_then(|mut stmt| {
                stmt.query_map([ident], |row| {
                    let id: String = row.get(0)?;
                    let latitude: Option<f64> = row.get(1)?;
                    let longitude: Option<f64> = row.get(2)?;

                    Ok(Waypoint::new(
                        WaypointKind::Airport,
                        id,
                        Coordinate::new(latitude.unwrap_or(0.0), longitude.unwrap_or(0.0)),
                    ))
                })?
                .collect::<std::result::Result<Waypoints, _>>()
            });

        match result {
            Ok(waypoints) => waypoints,
            Err(e) => {
                error!("[{}] error querying airport {}: {}", self.name, ident, e);
                Vec::new()
            }
        }
    }

    fn initialize(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }

        let conn = match open_read_only(&self.path) {
            Ok(conn) => conn,
            Err(e) => {
                error!("[{}] error opening database: {}", self.name, e);
                return false;
            }
        };

        if let Err(e) =
            validate_schema(&conn, "airports", &["ident", "latitude_deg", "longitude_deg"])
        {
            error!("[{}] database validation failed: {}", self.name, e);
            return false;
        }

        self.conn = Some(Mutex::new(conn));
        true
    }

    fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Reads the runway identifiers of an airport from a `runways` database.
///
/// Both runway ends are reported, e.g. `06` and `24` for a single strip.
/// This feeds the airport configurator; it is not a waypoint source.
pub fn airport_runway_idents(conn: &Connection, airport_ident: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT le_ident, he_ident FROM runways WHERE airport_ident = ?1 AND closed = 0",
    )?;

    let mut idents = Vec::new();
    let rows = stmt.query_map([airport_ident], |row| {
        let le: Option<String> = row.get(0)?;
        let he: Option<String> = row.get(1)?;
        Ok((le, he))
    })?;

    for row in rows {
        let (le, he) = row?;
        idents.extend(le);
        idents.extend(he);
    }

    Ok(idents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navaid_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE navaids (
                 ident TEXT, type TEXT, frequency_khz INTEGER,
                 latitude_deg REAL, longitude_deg REAL
             );
             INSERT INTO navaids VALUES ('PLK', 'VOR-DME', 11540, 14.006039, 108.024406);
             INSERT INTO navaids VALUES ('OB', 'NDB', 420, 53.60, 9.95);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn validates_schema() {
        let conn = navaid_db();
        assert!(validate_schema(
            &conn,
            "navaids",
            &["ident", "type", "frequency_khz", "latitude_deg", "longitude_deg"]
        )
        .is_ok());

        assert_eq!(
            validate_schema(&conn, "waypoints", &["identifier"]),
            Err(Error::MissingTable { table: "waypoints" })
        );
        assert_eq!(
            validate_schema(&conn, "navaids", &["elevation_ft"]),
            Err(Error::MissingColumn {
                table: "navaids",
                column: "elevation_ft"
            })
        );
    }

    #[test]
    fn navaid_rows_become_waypoints() {
        let conn = navaid_db();
        let provider = NavaidDbProvider {
            conn: Some(Mutex::new(conn)),
            path: PathBuf::new(),
            name: "Navaids DB".to_string(),
            priority: priority::NAVDATA,
        };

        let waypoints = provider.find_all("PLK");
        assert_eq!(waypoints.len(), 1);
        assert_eq!(waypoints[0].kind(), WaypointKind::Vor);
        assert_eq!(waypoints[0].frequency_hz(), Some(11_540_000));

        let waypoints = provider.find_all("OB");
        assert_eq!(waypoints[0].kind(), WaypointKind::Ndb);

        assert!(provider.find_all("XYZZY").is_empty());
    }

    #[test]
    fn runway_idents_report_both_ends() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE runways (
                 airport_ident TEXT, le_ident TEXT, he_ident TEXT, closed INTEGER
             );
             INSERT INTO runways VALUES ('ZSNJ', '06', '24', 0);
             INSERT INTO runways VALUES ('ZSNJ', '07', '25', 1);",
        )
        .unwrap();

        let idents = airport_runway_idents(&conn, "ZSNJ").unwrap();
        assert_eq!(idents, vec!["06", "24"]);
    }
}
