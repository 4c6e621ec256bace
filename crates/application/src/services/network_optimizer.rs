//! Network optimizer
//!
//! Evaluates every transport mode on every edge of a logistics network and
//! recommends mode changes that serve an optimization objective.
//!
//! Each edge fans out one route computation per mode; edges are evaluated
//! concurrently. Because route computation always yields a route, the only
//! reason an edge is not evaluated is an endpoint that names no known node.

use std::{fmt, sync::Arc};

use domain::{
    Edge, EdgeEvaluation, ModeOption, NetworkTotals, Node, OptimizationObjective,
    OptimizationRecommendation, OptimizationReport, RoutePreference, TransportMode, find_node,
};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::services::route_service::RouteService;

/// Currency-equivalent weight of one hour saved in the balanced objective
pub const BALANCED_HOUR_WEIGHT: f64 = 50.0;

/// Currency-equivalent weight of one kilometer saved in the balanced objective
pub const BALANCED_KM_WEIGHT: f64 = 10.0;

const BALANCED_COST_SHARE: f64 = 0.4;
const BALANCED_TIME_SHARE: f64 = 0.3;
const BALANCED_DISTANCE_SHARE: f64 = 0.3;

/// Network optimizer service
pub struct NetworkOptimizer {
    route_service: Arc<RouteService>,
}

impl fmt::Debug for NetworkOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkOptimizer").finish_non_exhaustive()
    }
}

impl NetworkOptimizer {
    /// Create a new optimizer on top of a route service
    pub fn new(route_service: Arc<RouteService>) -> Self {
        Self { route_service }
    }

    /// Evaluate all modes on all edges and collect recommendations
    ///
    /// Edges whose endpoints cannot be resolved are listed in
    /// `skipped_edges`; the remaining edges are still evaluated.
    #[instrument(skip(self, edges, nodes), fields(edges = edges.len(), nodes = nodes.len()))]
    pub async fn optimize_transport_modes(
        &self,
        edges: &[Edge],
        nodes: &[Node],
        objective: OptimizationObjective,
    ) -> OptimizationReport {
        let options_per_edge =
            join_all(edges.iter().map(|edge| self.evaluate_edge(edge, nodes))).await;

        let mut report = OptimizationReport {
            objective,
            current_totals: NetworkTotals::of_edges(edges),
            ..OptimizationReport::default()
        };

        for (edge, options) in edges.iter().zip(options_per_edge) {
            let Some(options) = options else {
                report.skipped_edges.push(edge.id.clone());
                continue;
            };
            let Some(selected) = select_best(&options, objective).copied() else {
                report.skipped_edges.push(edge.id.clone());
                continue;
            };

            if let Some(recommendation) = recommend(edge, &options, &selected, objective) {
                report.recommendations.push(recommendation);
            }

            report.evaluations.push(EdgeEvaluation {
                edge_id: edge.id.clone(),
                from_node: edge.from_node.clone(),
                to_node: edge.to_node.clone(),
                current_mode: edge.current_mode(),
                selected_mode: selected.mode,
                options,
            });
        }

        report.savings = report
            .recommendations
            .iter()
            .fold(NetworkTotals::default(), |acc, r| {
                acc + NetworkTotals {
                    cost: r.cost_delta,
                    time_hours: r.time_delta_hours,
                    distance_km: r.distance_delta_km,
                }
            });

        info!(
            %objective,
            evaluated = report.evaluations.len(),
            recommendations = report.recommendations.len(),
            skipped = report.skipped_edges.len(),
            cost_savings = report.savings.cost,
            "Network optimization finished"
        );
        report
    }

    /// Apply recommendations to a copy of the edges
    ///
    /// Recommended edges are re-routed at their new mode and take over its
    /// cost, time, distance, geometry and instructions. Recommendations are
    /// matched by edge id, so parallel edges between the same nodes are
    /// handled independently. Edges without a recommendation are returned
    /// unchanged.
    #[instrument(skip_all, fields(recommendations = recommendations.len()))]
    pub async fn apply_optimization(
        &self,
        recommendations: &[OptimizationRecommendation],
        edges: &[Edge],
        nodes: &[Node],
    ) -> Vec<Edge> {
        join_all(edges.iter().map(|edge| async move {
            let Some(recommendation) = recommendations.iter().find(|r| r.edge_id == edge.id)
            else {
                return edge.clone();
            };
            self.reroute(edge, nodes, recommendation.recommended_mode)
                .await
                .unwrap_or_else(|| edge.clone())
        }))
        .await
    }

    async fn evaluate_edge(&self, edge: &Edge, nodes: &[Node]) -> Option<Vec<ModeOption>> {
        let Some((from, to)) = resolve_endpoints(edge, nodes) else {
            warn!(edge = %edge.id, from = %edge.from_node, to = %edge.to_node, "Edge endpoint not found, skipping");
            return None;
        };

        let modes: Vec<TransportMode> = self
            .route_service
            .registry()
            .iter()
            .map(|(mode, _)| mode)
            .collect();

        let outcomes = join_all(modes.iter().map(|&mode| {
            self.route_service.calculate_route(
                from.location(),
                to.location(),
                mode,
                RoutePreference::default(),
            )
        }))
        .await;

        let options = modes
            .into_iter()
            .zip(outcomes)
            .map(|(mode, outcome)| {
                let route = outcome.route();
                ModeOption {
                    mode,
                    cost: route.cost,
                    duration_seconds: route.duration_seconds,
                    distance_meters: route.distance_meters,
                    is_fallback: outcome.is_fallback(),
                }
            })
            .collect::<Vec<_>>();

        debug!(edge = %edge.id, options = options.len(), "Edge evaluated");
        Some(options)
    }

    async fn reroute(&self, edge: &Edge, nodes: &[Node], mode: TransportMode) -> Option<Edge> {
        let Some((from, to)) = resolve_endpoints(edge, nodes) else {
            warn!(edge = %edge.id, "Cannot apply recommendation, endpoint not found");
            return None;
        };

        let route = self
            .route_service
            .calculate_route(from.location(), to.location(), mode, RoutePreference::default())
            .await
            .into_route();

        let updated = Edge {
            distance_km: route.distance_km(),
            travel_time_hr: route.duration_hours(),
            cost: route.cost,
            transport_mode: Some(mode),
            instructions: Some(route.instructions()),
            route_geometry: Some(route.geometry),
            ..edge.clone()
        };

        match updated.validate() {
            Ok(()) => Some(updated),
            Err(e) => {
                warn!(edge = %edge.id, error = %e, "Re-routed edge is invalid, keeping original");
                None
            },
        }
    }
}

fn resolve_endpoints<'a>(edge: &Edge, nodes: &'a [Node]) -> Option<(&'a Node, &'a Node)> {
    Some((find_node(nodes, &edge.from_node)?, find_node(nodes, &edge.to_node)?))
}

/// Pick the option that best serves the objective
///
/// Ties keep the earliest option, so callers control tie-breaking through
/// the order of `options`. Returns `None` only for an empty slice.
#[must_use]
pub fn select_best(options: &[ModeOption], objective: OptimizationObjective) -> Option<&ModeOption> {
    let max_cost = options.iter().map(|o| o.cost).fold(0.0, f64::max);
    let max_time = options.iter().map(|o| o.duration_seconds).fold(0.0, f64::max);
    let max_distance = options.iter().map(|o| o.distance_meters).fold(0.0, f64::max);

    let score = |option: &ModeOption| match objective {
        OptimizationObjective::Cost => option.cost,
        OptimizationObjective::Time => option.duration_seconds,
        OptimizationObjective::Distance => option.distance_meters,
        OptimizationObjective::Balanced => {
            BALANCED_COST_SHARE * normalized(option.cost, max_cost)
                + BALANCED_TIME_SHARE * normalized(option.duration_seconds, max_time)
                + BALANCED_DISTANCE_SHARE * normalized(option.distance_meters, max_distance)
        },
    };

    options.iter().min_by(|&a, &b| score(a).total_cmp(&score(b)))
}

fn normalized(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}

/// Build a recommendation for switching an edge to the selected option
///
/// The baseline is the evaluated option of the edge's current mode, or the
/// edge's recorded figures when that mode was not evaluated. Nothing is
/// recommended unless the mode changes and cost, time or distance strictly
/// improves.
#[must_use]
pub fn recommend(
    edge: &Edge,
    options: &[ModeOption],
    selected: &ModeOption,
    objective: OptimizationObjective,
) -> Option<OptimizationRecommendation> {
    let current_mode = edge.current_mode();
    if selected.mode == current_mode {
        return None;
    }

    let (base_cost, base_hours, base_km) = options
        .iter()
        .find(|o| o.mode == current_mode)
        .map_or((edge.cost, edge.travel_time_hr, edge.distance_km), |o| {
            (o.cost, o.time_hours(), o.distance_km())
        });

    let cost_delta = base_cost - selected.cost;
    let time_delta_hours = base_hours - selected.time_hours();
    let distance_delta_km = base_km - selected.distance_km();

    if !(cost_delta > 0.0 || time_delta_hours > 0.0 || distance_delta_km > 0.0) {
        return None;
    }

    let savings_score = match objective {
        OptimizationObjective::Cost => cost_delta,
        OptimizationObjective::Time => time_delta_hours,
        OptimizationObjective::Distance => distance_delta_km,
        OptimizationObjective::Balanced => {
            cost_delta + time_delta_hours * BALANCED_HOUR_WEIGHT + distance_delta_km * BALANCED_KM_WEIGHT
        },
    };

    Some(OptimizationRecommendation {
        edge_id: edge.id.clone(),
        from_node: edge.from_node.clone(),
        to_node: edge.to_node.clone(),
        current_mode,
        recommended_mode: selected.mode,
        reason: reason(selected.mode, objective, cost_delta, time_delta_hours, distance_delta_km),
        savings_score,
        cost_delta,
        time_delta_hours,
        distance_delta_km,
    })
}

fn reason(
    mode: TransportMode,
    objective: OptimizationObjective,
    cost_delta: f64,
    time_delta_hours: f64,
    distance_delta_km: f64,
) -> String {
    let mut gains = Vec::new();
    if cost_delta > 0.0 {
        gains.push(format!("saves {cost_delta:.0} in cost"));
    }
    if time_delta_hours > 0.0 {
        gains.push(format!("{:.0} min faster", time_delta_hours * 60.0));
    }
    if distance_delta_km > 0.0 {
        gains.push(format!("{distance_delta_km:.2} km shorter"));
    }
    format!("Switch to {mode} for best {objective}: {}", gains.join(", "))
}
