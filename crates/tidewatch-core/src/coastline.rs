// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Coastline Distance Oracle
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use async_trait::async_trait;

use tidewatch_types::{Coordinates, Layer, TidewatchError, TidewatchResult};

/// Distance from a point to the nearest coastline, in kilometres.
#[async_trait]
pub trait CoastlineOracle: Send + Sync {
    async fn distance_to_coast_km(&self, at: Coordinates) -> TidewatchResult<f64>;
}

/// Oracle reporting the same distance for every point.
pub struct FixedDistance(pub f64);

#[async_trait]
impl CoastlineOracle for FixedDistance {
    async fn distance_to_coast_km(&self, _at: Coordinates) -> TidewatchResult<f64> {
        Ok(self.0)
    }
}

/// Oracle over a list of coastline sample points, using great-circle
/// distance to the nearest sample.
pub struct CoastlinePoints {
    points: Vec<Coordinates>,
}

const EARTH_RADIUS_KM: f64 = 6371.0;

impl CoastlinePoints {
    pub fn new(points: Vec<Coordinates>) -> Self {
        Self { points }
    }

    pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
        let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (b.longitude - a.longitude).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
    }
}

#[async_trait]
impl CoastlineOracle for CoastlinePoints {
    async fn distance_to_coast_km(&self, at: Coordinates) -> TidewatchResult<f64> {
        if self.points.is_empty() {
            return Err(TidewatchError::EvidenceUnavailable {
                layer: Layer::Geofence,
                reason: "no coastline points loaded".to_string(),
            });
        }
        Ok(self
            .points
            .iter()
            .map(|p| Self::haversine_km(at, *p))
            .fold(f64::INFINITY, f64::min))
    }
}

type DistanceFn = Arc<dyn Fn(Coordinates) -> TidewatchResult<f64> + Send + Sync>;

/// External oracle that calls a lookup function on the blocking pool.
pub struct ExternalCoastline {
    distance_fn: DistanceFn,
}

impl ExternalCoastline {
    pub fn new(
        distance_fn: impl Fn(Coordinates) -> TidewatchResult<f64> + Send + Sync + 'static,
    ) -> Self {
        Self {
            distance_fn: Arc::new(distance_fn),
        }
    }
}

#[async_trait]
impl CoastlineOracle for ExternalCoastline {
    async fn distance_to_coast_km(&self, at: Coordinates) -> TidewatchResult<f64> {
        let distance_fn = Arc::clone(&self.distance_fn);
        tokio::task::spawn_blocking(move || distance_fn(at))
            .await
            .map_err(|e| TidewatchError::EvidenceUnavailable {
                layer: Layer::Geofence,
                reason: format!("coastline lookup failed: {e}"),
            })?
    }
}
