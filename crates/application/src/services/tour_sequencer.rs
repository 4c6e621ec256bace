//! Tour sequencing
//!
//! Orders a set of stops into one visiting sequence with the nearest-neighbor
//! heuristic: start at the first stop and always move to the closest stop not
//! yet visited.
//!
//! # Complexity
//!
//! O(n²) great-circle distance evaluations. The result is a heuristic tour,
//! not an optimal one.

use std::sync::Arc;

use domain::{GeoPoint, TransportMode, TransportModeRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A visiting sequence and its straight-line totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPlan {
    /// Indices into the input stops, in visiting order
    pub order: Vec<usize>,
    /// Sum of leg distances in meters
    pub total_distance_meters: f64,
    /// Sum of leg durations in seconds at the mode's maximum speed
    pub total_duration_seconds: f64,
    /// Distance cost of the whole tour
    pub total_cost: f64,
}

impl TourPlan {
    /// Identity order with zero totals
    fn trivial(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
            total_distance_meters: 0.0,
            total_duration_seconds: 0.0,
            total_cost: 0.0,
        }
    }
}

/// Greedy tour builder
#[derive(Debug, Clone)]
pub struct TourSequencer {
    registry: Arc<TransportModeRegistry>,
}

impl TourSequencer {
    /// Create a sequencer using the given mode table
    #[must_use]
    pub const fn new(registry: Arc<TransportModeRegistry>) -> Self {
        Self { registry }
    }

    /// Order stops starting from index 0
    ///
    /// With two stops or fewer the identity order is returned and all totals
    /// are zero. Among equidistant candidates the lowest index wins, so the
    /// result is deterministic for a given input order.
    #[must_use]
    pub fn optimize_route(&self, stops: &[GeoPoint], mode: TransportMode) -> TourPlan {
        let n = stops.len();
        if n <= 2 {
            return TourPlan::trivial(n);
        }

        let profile = self.registry.lookup(mode);
        let mut visited = vec![false; n];
        visited[0] = true;
        let mut order = Vec::with_capacity(n);
        order.push(0);

        let mut current = 0;
        let mut total_distance_meters = 0.0;
        let mut total_duration_seconds = 0.0;

        while order.len() < n {
            let mut best: Option<(usize, f64)> = None;
            for (i, stop) in stops.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let d = stops[current].distance_meters(stop);
                if best.is_none_or(|(_, best_d)| d < best_d) {
                    best = Some((i, d));
                }
            }

            let Some((next, leg_meters)) = best else {
                break;
            };

            visited[next] = true;
            order.push(next);
            total_distance_meters += leg_meters;
            total_duration_seconds += leg_meters / 1000.0 / profile.max_speed_kmh * 3600.0;
            current = next;
        }

        let total_cost = (total_distance_meters / 1000.0 * profile.cost_per_km).round();

        debug!(
            stops = n,
            %mode,
            distance_m = total_distance_meters,
            "Tour sequenced"
        );

        TourPlan {
            order,
            total_distance_meters,
            total_duration_seconds,
            total_cost,
        }
    }
}
