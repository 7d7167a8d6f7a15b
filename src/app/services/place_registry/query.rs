//! Nearest-place search
//!
//! Great-circle nearest neighbour over the latitude-sorted index. The sweep
//! walks outward from the query latitude in both directions and stops once the
//! meridian distance alone, `R * |dlat|`, exceeds the best match so far.

use super::PlaceRegistry;
use crate::app::models::Place;
use crate::constants::EARTH_RADIUS_KM;

/// Great-circle distance between two points in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Rounding allowance when comparing the meridian bound against haversine output
const PRUNE_SLACK_KM: f64 = 1e-6;

/// Lower bound on the distance to any point at `lat2`
fn meridian_km(lat1: f64, lat2: f64) -> f64 {
    EARTH_RADIUS_KM * (lat2 - lat1).to_radians().abs()
}

/// Running best match during a sweep
struct Nearest {
    distance_km: f64,
    indices: Vec<usize>,
}

impl Nearest {
    fn new() -> Self {
        Self {
            distance_km: f64::INFINITY,
            indices: Vec::new(),
        }
    }

    /// Whether no place at `latitude` can match or beat the current best
    fn prunes(&self, query_latitude: f64, latitude: f64) -> bool {
        meridian_km(query_latitude, latitude) - self.distance_km > PRUNE_SLACK_KM
    }

    fn offer(&mut self, index: usize, distance_km: f64) {
        if distance_km < self.distance_km {
            self.distance_km = distance_km;
            self.indices.clear();
            self.indices.push(index);
        } else if distance_km == self.distance_km {
            self.indices.push(index);
        }
    }
}

impl PlaceRegistry {
    /// Find the nearest place(s) to a coordinate pair
    ///
    /// Places tied at exactly the minimum distance are all returned, in
    /// table order. An empty registry returns nothing.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Vec<&Place> {
        self.nearest_with_distance(latitude, longitude)
            .map(|(_, places)| places)
            .unwrap_or_default()
    }

    /// Like [`nearest`](Self::nearest), also returning the distance in kilometres
    pub fn nearest_with_distance(&self, latitude: f64, longitude: f64) -> Option<(f64, Vec<&Place>)> {
        if self.places.is_empty() || !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }

        let start = self
            .by_latitude
            .partition_point(|&i| self.places[i].lat < latitude);
        let mut best = Nearest::new();

        for &index in &self.by_latitude[start..] {
            let place = &self.places[index];
            if best.prunes(latitude, place.lat) {
                break;
            }
            best.offer(index, haversine_km(latitude, longitude, place.lat, place.lon));
        }

        for &index in self.by_latitude[..start].iter().rev() {
            let place = &self.places[index];
            if best.prunes(latitude, place.lat) {
                break;
            }
            best.offer(index, haversine_km(latitude, longitude, place.lat, place.lon));
        }

        best.indices.sort_unstable();
        let places = best.indices.iter().map(|&i| &self.places[i]).collect();
        Some((best.distance_km, places))
    }
}
