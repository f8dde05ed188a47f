use std::collections::HashMap;

use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::calculation::edge_weight::EdgeWeightCalculator;
use crate::domain::graph::weight_key::WeightKey;
use crate::domain::utils::id::NodeId;

/// Waypoint candidates of a service function chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceFunctionChainOptions {
    /// Every assignment of routers to the requested services, in service order.
    pub sequences: Vec<Vec<NodeId>>,

    /// One table per requested service, in chain order: candidate router -> SID of that service on it.
    pub service_sids: Vec<HashMap<NodeId, String>>,
}

/// Everything a calculation needs, derived from one path request.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationOptions {
    pub source_node: NodeId,
    pub destination_node: NodeId,
    pub weight_keys: Vec<WeightKey>,
    pub calculation_mode: CalculationMode,

    /// An edge is skipped when its value for a key lies above the bound.
    pub max_constraints: HashMap<WeightKey, f64>,

    /// An edge is skipped when its value for a key lies below the bound.
    pub min_constraints: HashMap<WeightKey, f64>,

    pub two_factor_weights: [f64; 2],
    pub three_factor_weights: [f64; 3],

    /// 0 selects the full topology.
    pub flex_algo: u32,
    pub service_function_chain: Option<ServiceFunctionChainOptions>,
}

impl CalculationOptions {
    pub fn new(source_node: NodeId, destination_node: NodeId, weight_keys: Vec<WeightKey>, calculation_mode: CalculationMode) -> Self {
        Self {
            source_node,
            destination_node,
            weight_keys,
            calculation_mode,
            max_constraints: HashMap::new(),
            min_constraints: HashMap::new(),
            two_factor_weights: [0.7, 0.3],
            three_factor_weights: [0.5, 0.3, 0.2],
            flex_algo: 0,
            service_function_chain: None,
        }
    }

    pub fn edge_weight_calculator(&self) -> EdgeWeightCalculator {
        EdgeWeightCalculator::new(self.weight_keys.clone(), self.two_factor_weights, self.three_factor_weights)
    }
}
