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

use std::collections::{HashMap, VecDeque};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::nd::Waypoint;

/// The enroute altitude class of an airway.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirwayLevel {
    /// 'B', usable both high and low.
    Both,
    /// 'H', high level only.
    High,
    /// 'L', low level only.
    Low,
    Unknown,
}

impl AirwayLevel {
    pub fn from_char(level: char) -> Self {
        match level {
            'B' => Self::Both,
            'H' => Self::High,
            'L' => Self::Low,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for AirwayLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Both => write!(f, "B"),
            Self::High => write!(f, "H"),
            Self::Low => write!(f, "L"),
            Self::Unknown => write!(f, "U"),
        }
    }
}

/// One traversable edge of an airway path.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirwaySegmentInfo {
    pub from: Waypoint,
    pub to: Waypoint,
    /// Minimum crossing level in feet AMSL. Zero means not published and
    /// passes any level gate.
    pub minimum_level: u32,
    pub can_traverse: bool,
}

/// Why a path along an airway could not be produced.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TraversalError {
    /// No airway with the requested name is known.
    AirwayNotFound,
    /// A fix is not part of the airway.
    FixNotFound,
    /// Both fixes are on the airway but no traversable chain connects them
    /// in that direction.
    InvalidDirection,
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AirwayNotFound => write!(f, "airway not found"),
            Self::FixNotFound => write!(f, "fix not found in airway"),
            Self::InvalidDirection => write!(f, "airway cannot be traversed in this direction"),
        }
    }
}

impl std::error::Error for TraversalError {}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Connection {
    from_idx: usize,
    to_idx: usize,
    minimum_level: u32,
    can_traverse: bool,
}

/// A named airway as a directed graph over interned fixes.
///
/// Fixes are deduplicated by identifier and indexed in insertion order; the
/// connections reference them by index. Several `Airway` values may share a
/// name when the same designator is reused in disjoint regions of the world;
/// keeping them apart is the job of [`AirwayNetwork`].
///
/// [`AirwayNetwork`]: super::AirwayNetwork
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Airway {
    name: String,
    level: AirwayLevel,
    fixes: Vec<Waypoint>,
    fix_indices: HashMap<String, usize>,
    ordered_fixes: Vec<Waypoint>,
    connections: Vec<Connection>,
}

impl Airway {
    pub(crate) fn new(name: impl Into<String>, level: AirwayLevel) -> Self {
        Self {
            name: name.into(),
            level,
            fixes: Vec::new(),
            fix_indices: HashMap::new(),
            ordered_fixes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> AirwayLevel {
        self.level
    }

    /// All fixes in insertion order.
    pub fn fixes(&self) -> &[Waypoint] {
        &self.fixes
    }

    /// The display order computed by [`finalize`](Self::finalize). Path
    /// search does not use this order; it walks the connections.
    pub fn fixes_in_order(&self) -> &[Waypoint] {
        &self.ordered_fixes
    }

    pub fn has_fix(&self, ident: &str) -> bool {
        self.fix_indices.contains_key(ident)
    }

    fn intern_fix(&mut self, fix: Waypoint) -> usize {
        if let Some(&idx) = self.fix_indices.get(fix.ident()) {
            return idx;
        }

        let idx = self.fixes.len();
        self.fix_indices.insert(fix.ident().to_string(), idx);
        self.fixes.push(fix);
        idx
    }

    /// Adds or updates the connection `from` → `to`.
    ///
    /// For any ordered fix pair at most one connection exists; a later
    /// insertion overwrites the minimum level and the traversal flag.
    pub(crate) fn add_segment(
        &mut self,
        from: Waypoint,
        to: Waypoint,
        minimum_level: u32,
        can_traverse: bool,
    ) {
        let from_idx = self.intern_fix(from);
        let to_idx = self.intern_fix(to);

        if let Some(conn) = self
            .connections
            .iter_mut()
            .find(|c| c.from_idx == from_idx && c.to_idx == to_idx)
        {
            conn.minimum_level = minimum_level;
            conn.can_traverse = can_traverse;
            return;
        }

        self.connections.push(Connection {
            from_idx,
            to_idx,
            minimum_level,
            can_traverse,
        });
    }

    /// Computes the display order of the fixes.
    pub(crate) fn finalize(&mut self) {
        if self.fixes.is_empty() {
            return;
        }

        let directional = self.connections.iter().any(|conn| {
            !self
                .connections
                .iter()
                .any(|c| c.from_idx == conn.to_idx && c.to_idx == conn.from_idx && c.can_traverse)
        });

        if directional {
            self.compute_directional_order();
        } else {
            self.compute_geographic_order();
        }
    }

    fn compute_directional_order(&mut self) {
        let mut adjacent = vec![Vec::new(); self.fixes.len()];
        let mut in_degree = vec![0usize; self.fixes.len()];

        for conn in &self.connections {
            if conn.can_traverse {
                adjacent[conn.from_idx].push(conn.to_idx);
                in_degree[conn.to_idx] += 1;
            }
        }

        let start_idx = (0..self.fixes.len())
            .find(|&i| in_degree[i] == 0 && !adjacent[i].is_empty())
            .unwrap_or(0);

        let mut visited = vec![false; self.fixes.len()];
        let mut order = Vec::with_capacity(self.fixes.len());

        fn dfs(current: usize, adjacent: &[Vec<usize>], visited: &mut [bool], order: &mut Vec<usize>) {
            visited[current] = true;
            order.push(current);

            for &next in &adjacent[current] {
                if !visited[next] {
                    dfs(next, adjacent, visited, order);
                }
            }
        }

        dfs(start_idx, &adjacent, &mut visited, &mut order);

        for i in 0..self.fixes.len() {
            if !visited[i] {
                order.push(i);
            }
        }

        self.ordered_fixes = order.into_iter().map(|i| self.fixes[i].clone()).collect();
    }

    fn compute_geographic_order(&mut self) {
        self.ordered_fixes = self.fixes.clone();
        self.ordered_fixes.sort_by(|a, b| {
            a.coordinate()
                .longitude
                .total_cmp(&b.coordinate().longitude)
        });
    }

    /// Finds the traversable path `from` → `to` with a breadth-first search
    /// over the connections and reconstructs it as a segment chain.
    pub fn segments_between(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<AirwaySegmentInfo>, TraversalError> {
        let &from_idx = self.fix_indices.get(from).ok_or(TraversalError::FixNotFound)?;
        let &to_idx = self.fix_indices.get(to).ok_or(TraversalError::FixNotFound)?;

        let mut parent = vec![usize::MAX; self.fixes.len()];
        let mut connection_idx = vec![usize::MAX; self.fixes.len()];
        let mut visited = vec![false; self.fixes.len()];
        let mut queue = VecDeque::new();

        queue.push_back(from_idx);
        visited[from_idx] = true;

        let mut found = false;
        'search: while let Some(current) = queue.pop_front() {
            for (i, conn) in self.connections.iter().enumerate() {
                if conn.from_idx != current || !conn.can_traverse {
                    continue;
                }

                if !visited[conn.to_idx] {
                    visited[conn.to_idx] = true;
                    parent[conn.to_idx] = current;
                    connection_idx[conn.to_idx] = i;
                    queue.push_back(conn.to_idx);

                    if conn.to_idx == to_idx {
                        found = true;
                        break 'search;
                    }
                }
            }
        }

        if !found {
            return Err(TraversalError::InvalidDirection);
        }

        let mut path = Vec::new();
        let mut current = to_idx;
        while current != from_idx {
            let conn = &self.connections[connection_idx[current]];
            path.push(AirwaySegmentInfo {
                from: self.fixes[conn.from_idx].clone(),
                to: self.fixes[conn.to_idx].clone(),
                minimum_level: conn.minimum_level,
                can_traverse: conn.can_traverse,
            });
            current = parent[current];
        }
        path.reverse();

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coordinate;
    use crate::nd::WaypointKind;

    fn fix(ident: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(WaypointKind::Fix, ident, Coordinate::new(lat, lon))
    }

    fn one_way_chain() -> Airway {
        //  A ──▶ B ──▶ C
        let mut airway = Airway::new("T161", AirwayLevel::Low);
        airway.add_segment(fix("ASPAT", 49.196175, 10.725828), fix("DEBHI", 49.360833, 10.466111), 18000, true);
        airway.add_segment(fix("DEBHI", 49.360833, 10.466111), fix("URSAL", 49.525000, 10.206944), 18000, true);
        airway
    }

    #[test]
    fn interns_fixes_once() {
        let airway = one_way_chain();
        assert_eq!(airway.fixes().len(), 3);
        assert!(airway.has_fix("DEBHI"));
        assert!(!airway.has_fix("BANSU"));
    }

    #[test]
    fn finds_path_over_intermediate_fix() {
        let airway = one_way_chain();
        let segments = airway.segments_between("ASPAT", "URSAL").unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].from.ident(), "ASPAT");
        assert_eq!(segments[0].to.ident(), "DEBHI");
        assert_eq!(segments[1].from.ident(), "DEBHI");
        assert_eq!(segments[1].to.ident(), "URSAL");
        assert_eq!(segments[0].minimum_level, 18000);
    }

    #[test]
    fn rejects_path_against_direction() {
        let airway = one_way_chain();
        assert_eq!(
            airway.segments_between("URSAL", "ASPAT"),
            Err(TraversalError::InvalidDirection)
        );
    }

    #[test]
    fn rejects_unknown_fix() {
        let airway = one_way_chain();
        assert_eq!(
            airway.segments_between("ASPAT", "BANSU"),
            Err(TraversalError::FixNotFound)
        );
    }

    #[test]
    fn never_crosses_untraversable_edge() {
        let mut airway = Airway::new("Y6", AirwayLevel::Both);
        airway.add_segment(fix("IDESI", 51.897706, 1.885578), fix("TOSVA", 51.677056, 2.073983), 10500, false);
        airway.add_segment(fix("TOSVA", 51.677056, 2.073983), fix("IDESI", 51.897706, 1.885578), 10500, true);

        assert_eq!(
            airway.segments_between("IDESI", "TOSVA"),
            Err(TraversalError::InvalidDirection)
        );
        assert!(airway.segments_between("TOSVA", "IDESI").is_ok());
    }

    #[test]
    fn later_insertion_overwrites_connection() {
        let mut airway = Airway::new("Y6", AirwayLevel::Both);
        airway.add_segment(fix("A", 0.0, 0.0), fix("B", 1.0, 1.0), 5000, true);
        airway.add_segment(fix("A", 0.0, 0.0), fix("B", 1.0, 1.0), 7500, true);

        let segments = airway.segments_between("A", "B").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].minimum_level, 7500);
    }

    #[test]
    fn directional_order_follows_edges() {
        let mut airway = one_way_chain();
        airway.finalize();

        let order: Vec<_> = airway.fixes_in_order().iter().map(|f| f.ident()).collect();
        assert_eq!(order, vec!["ASPAT", "DEBHI", "URSAL"]);
    }

    #[test]
    fn bidirectional_order_sorts_by_longitude() {
        let mut airway = Airway::new("W11", AirwayLevel::Low);
        airway.add_segment(fix("BANSU", 14.286111, 108.159722), fix("PLK", 14.006039, 108.024406), 10000, true);
        airway.add_segment(fix("PLK", 14.006039, 108.024406), fix("BANSU", 14.286111, 108.159722), 10000, true);
        airway.add_segment(fix("BANSU", 14.286111, 108.159722), fix("TALAP", 14.415000, 108.221111), 10000, true);
        airway.add_segment(fix("TALAP", 14.415000, 108.221111), fix("BANSU", 14.286111, 108.159722), 10000, true);
        airway.finalize();

        let order: Vec<_> = airway.fixes_in_order().iter().map(|f| f.ident()).collect();
        assert_eq!(order, vec!["PLK", "BANSU", "TALAP"]);
    }
}
