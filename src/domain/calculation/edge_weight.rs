use crate::domain::graph::edge::NetworkEdge;
use crate::domain::graph::weight_key::WeightKey;
use crate::error::{Error, Result};

/// Turns the metrics of an edge into the single weight the calculations relax with.
///
/// One key uses the value as is, two and three keys are blended with the configured
/// factor weights. Packet loss as the only key is optimized in log space: every edge
/// contributes `-ln(1 - loss / 100)` so that summing equals multiplying survival
/// probabilities. [`EdgeWeightCalculator::to_reported_cost`] converts back to percent.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWeightCalculator {
    weight_keys: Vec<WeightKey>,
    two_factor_weights: [f64; 2],
    three_factor_weights: [f64; 3],
}

impl EdgeWeightCalculator {
    pub fn new(weight_keys: Vec<WeightKey>, two_factor_weights: [f64; 2], three_factor_weights: [f64; 3]) -> Self {
        Self { weight_keys, two_factor_weights, three_factor_weights }
    }

    pub fn get_weight_keys(&self) -> &[WeightKey] {
        &self.weight_keys
    }

    pub fn is_packet_loss_objective(&self) -> bool {
        self.weight_keys == [WeightKey::PacketLoss]
    }

    /// Blended, untransformed weight of an edge.
    pub fn get_edge_weight(&self, edge: &NetworkEdge) -> Result<f64> {
        match self.weight_keys.as_slice() {
            [key] => edge.get_weight(*key),
            [first, second] => {
                Ok(edge.get_weight(*first)? * self.two_factor_weights[0] + edge.get_weight(*second)? * self.two_factor_weights[1])
            }
            [first, second, third] => Ok(edge.get_weight(*first)? * self.three_factor_weights[0]
                + edge.get_weight(*second)? * self.three_factor_weights[1]
                + edge.get_weight(*third)? * self.three_factor_weights[2]),
            keys => Err(Error::UndefinedWeightMapping(format!("{} weight keys", keys.len()))),
        }
    }

    /// Weight used during relaxation.
    pub fn get_relaxation_weight(&self, edge: &NetworkEdge) -> Result<f64> {
        let weight = self.get_edge_weight(edge)?;

        if self.is_packet_loss_objective() { Ok(packet_loss_to_log_cost(weight)) } else { Ok(weight) }
    }

    /// Converts an accumulated relaxation cost into the value reported on the path.
    pub fn to_reported_cost(&self, internal_cost: f64) -> f64 {
        if self.is_packet_loss_objective() { (1.0 - (-internal_cost).exp()) * 100.0 } else { internal_cost }
    }

    /// Inverse of [`EdgeWeightCalculator::to_reported_cost`], used to seed follow-up calculations.
    pub fn to_internal_cost(&self, reported_cost: f64) -> f64 {
        if self.is_packet_loss_objective() { packet_loss_to_log_cost(reported_cost) } else { reported_cost }
    }
}

/// `-ln(1 - loss / 100)`, infinite for a link that drops everything.
fn packet_loss_to_log_cost(loss_percent: f64) -> f64 {
    let survival = 1.0 - loss_percent / 100.0;
    if survival <= 0.0 { f64::INFINITY } else { -survival.ln() }
}
