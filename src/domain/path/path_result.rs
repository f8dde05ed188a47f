use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::graph::weight_key::WeightKey;
use crate::domain::intent::Intent;
use crate::domain::path::path::Path;
use crate::domain::path::path_request::PathRequest;

/// Snapshot handed to the transport layer: the request it answers plus the SID list.
///
/// `path` is `None` when no path was found; the SID list then only holds the
/// destination address so that traffic still gets delivered best effort.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub ipv6_source_address: String,
    pub ipv6_destination_address: String,
    pub intents: Vec<Intent>,

    pub sid_list: Vec<String>,
    pub service_sid_list: Vec<String>,

    pub path: Option<Path>,
    pub calculation_mode: CalculationMode,
    pub weight_keys: Vec<WeightKey>,
    pub flex_algo: u32,
}

impl PathResult {
    pub fn new(
        request: &PathRequest,
        sid_list: Vec<String>,
        service_sid_list: Vec<String>,
        path: Option<Path>,
        calculation_mode: CalculationMode,
        weight_keys: Vec<WeightKey>,
        flex_algo: u32,
    ) -> Self {
        Self {
            ipv6_source_address: request.ipv6_source_address.clone(),
            ipv6_destination_address: request.ipv6_destination_address.clone(),
            intents: request.intents.clone(),
            sid_list,
            service_sid_list,
            path,
            calculation_mode,
            weight_keys,
            flex_algo,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.path.is_none()
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.path.as_ref().map(|path| path.total_cost)
    }

    pub fn bottleneck_value(&self) -> Option<f64> {
        self.path.as_ref().map(|path| path.bottleneck_value)
    }
}
