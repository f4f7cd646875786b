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

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use geo::{Distance, Haversine};

/// Coordinate value.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in the range from -90° (south) to 90° (north).
    pub latitude: f64,

    /// Longitude in the range from -180° (west) to 180° (east).
    pub longitude: f64,
}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            latitude: p.y(),
            longitude: p.x(),
        }
    }
}

impl Coordinate {
    /// Creates a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the great-circle distance from this point to the `other` in
    /// kilometers.
    ///
    /// The distance is spherical and meant for comparing candidates against
    /// each other; absolute accuracy is not a contract.
    pub fn dist_km(&self, other: &Coordinate) -> f64 {
        Haversine.distance((*self).into(), (*other).into()) / 1000.0
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({0}, {1})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dist_between_known_points() {
        // Hamburg to Luebeck is a bit under 60 km.
        let eddh = Coordinate::new(53.63, 9.99);
        let edhl = Coordinate::new(53.81, 10.70);

        let dist = eddh.dist_km(&edhl);
        assert!((50.0..65.0).contains(&dist), "dist was {dist} km");
    }

    #[test]
    fn dist_is_symmetric() {
        let a = Coordinate::new(49.196175, 10.725828);
        let b = Coordinate::new(49.360833, 10.466111);

        assert!((a.dist_km(&b) - b.dist_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn dist_to_self_is_zero() {
        let p = Coordinate::new(51.897706, 1.885578);
        assert_eq!(p.dist_km(&p), 0.0);
    }
}
