use crate::config::HawkEyeConfig;
use crate::domain::cache::cache_trait::Cache;
use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::calculation::edge_weight::EdgeWeightCalculator;
use crate::domain::graph::topology::Graph;
use crate::domain::intent::IntentType;
use crate::domain::path::path::Path;
use crate::domain::path::path_result::PathResult;
use crate::domain::session::stream_session::StreamSession;
use crate::error::{Error, Result};

/// Decides whether a freshly calculated path replaces the one a session applies.
///
/// A new route is only handed out when the old one broke or the new one is better by
/// more than the flapping threshold, so clients are not pushed between near equal paths.
#[derive(Debug, Clone)]
pub struct CalculationUpdaterService {
    config: HawkEyeConfig,
}

impl CalculationUpdaterService {
    pub fn new(config: HawkEyeConfig) -> Self {
        Self { config }
    }

    pub fn get_flapping_threshold(&self) -> f64 {
        self.config.flapping_threshold
    }

    /// Returns the new result when it replaced the applied one, `None` when the session keeps its path.
    ///
    /// Fails with [`Error::StaleTopology`] when the route is unchanged but one of its edges is gone.
    pub fn update_session(&self, session: &mut StreamSession, new_result: PathResult, graph: &dyn Graph, cache: &dyn Cache) -> Result<Option<PathResult>> {
        if session.get_result().sid_list == new_result.sid_list {
            self.refresh_in_place(session.get_result_mut(), &new_result, graph)?;
            return Ok(None);
        }

        if self.should_replace(session, &new_result, graph, cache) {
            log::info!(
                "Replacing path of session {}: {:?} -> {:?}",
                session.id,
                session.get_result().sid_list,
                new_result.sid_list
            );
            session.set_result(new_result.clone());
            return Ok(Some(new_result));
        }

        Ok(None)
    }

    /// Same route: check it still exists and take over the current metrics.
    fn refresh_in_place(&self, current: &mut PathResult, new_result: &PathResult, graph: &dyn Graph) -> Result<()> {
        let mode = current.calculation_mode;
        let Some(path) = current.path.as_mut() else {
            return Ok(());
        };

        Self::verify_edges(path, graph)?;

        if let Some(fresh) = &new_result.path {
            match mode {
                CalculationMode::Sum => {
                    path.total_cost = fresh.total_cost;
                }
                CalculationMode::Min | CalculationMode::Max => {
                    path.total_cost = fresh.total_cost;
                    path.bottleneck_edge = fresh.bottleneck_edge.clone();
                    path.bottleneck_value = fresh.bottleneck_value;
                }
            }
            path.total_delay = fresh.total_delay;
            path.total_jitter = fresh.total_jitter;
            path.total_packet_loss = fresh.total_packet_loss;
        }
        Ok(())
    }

    fn should_replace(&self, session: &StreamSession, new_result: &PathResult, graph: &dyn Graph, cache: &dyn Cache) -> bool {
        let current = session.get_result();

        if session.get_request().first_intent_type() == Some(IntentType::Sfc) {
            if let Some(missing) = current.service_sid_list.iter().find(|sid| !cache.does_service_sid_exist(sid)) {
                log::info!("ServiceSidWithdrawn: {} of session {} no longer exists", missing, session.id);
                return true;
            }
        }

        let Some(current_path) = current.path.as_ref() else {
            // A degraded session takes any real path.
            return new_result.path.is_some();
        };

        let current_cost = match self.get_current_cost(current_path, current, graph) {
            Ok(cost) => cost,
            Err(e) => {
                log::info!("StaleTopology: session {} is replaced: {}", session.id, e);
                return true;
            }
        };

        let Some(new_cost) = new_result.total_cost() else {
            log::debug!("Session {} keeps its path, no alternative was found", session.id);
            return false;
        };

        let threshold = self.config.flapping_threshold;
        let improves = match current.calculation_mode {
            CalculationMode::Sum | CalculationMode::Min => new_cost < current_cost * (1.0 - threshold),
            CalculationMode::Max => new_cost > current_cost * (1.0 + threshold),
        };

        log::debug!(
            "Session {}: current cost {}, new cost {}, mode {:?}, replace {}",
            session.id,
            current_cost,
            new_cost,
            current.calculation_mode,
            improves
        );
        improves
    }

    fn verify_edges(path: &Path, graph: &dyn Graph) -> Result<()> {
        match path.edges.iter().find(|edge_id| !graph.edge_exists(edge_id)) {
            Some(edge_id) => Err(Error::StaleTopology(edge_id.clone())),
            None => Ok(()),
        }
    }

    /// Cost of the applied path on the live graph, in the unit of [`Path::total_cost`].
    pub fn get_current_cost(&self, path: &Path, result: &PathResult, graph: &dyn Graph) -> Result<f64> {
        let weights = EdgeWeightCalculator::new(result.weight_keys.clone(), self.config.two_factor_weights, self.config.three_factor_weights);
        let mut cost = match result.calculation_mode {
            CalculationMode::Sum => 0.0,
            CalculationMode::Min | CalculationMode::Max => f64::INFINITY,
        };

        for edge_id in &path.edges {
            let edge = graph.get_edge(edge_id).ok_or_else(|| Error::StaleTopology(edge_id.clone()))?;
            let weight = weights.get_relaxation_weight(edge)?;
            cost = result.calculation_mode.combine(cost, weight);
        }

        Ok(match result.calculation_mode {
            CalculationMode::Sum => weights.to_reported_cost(cost),
            CalculationMode::Min | CalculationMode::Max => cost,
        })
    }
}
