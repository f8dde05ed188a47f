use std::collections::HashMap;

use crate::config::HawkEyeConfig;
use crate::domain::cache::cache_trait::Cache;
use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::calculation::calculation_options::{CalculationOptions, ServiceFunctionChainOptions};
use crate::domain::graph::topology::Graph;
use crate::domain::graph::weight_key::WeightKey;
use crate::domain::intent::{Intent, IntentType, IntentValue};
use crate::domain::path::path_request::PathRequest;
use crate::domain::utils::id::NodeId;
use crate::domain::utils::network_address::get_network_address;
use crate::error::{Error, Result};

/// Selectors that lead a request and the algorithm they pick.
struct Selectors<'r> {
    offset: usize,
    flex_algo: u32,
    sfc: Option<&'r Intent>,
}

/// Translates a [`PathRequest`] into the [`CalculationOptions`] of one calculation.
///
/// Works on the locked graph and cache handed in by the manager, so every lookup of
/// one setup sees the same topology.
#[derive(Debug, Clone)]
pub struct CalculationSetupProvider {
    config: HawkEyeConfig,
}

impl CalculationSetupProvider {
    pub fn new(config: HawkEyeConfig) -> Self {
        Self { config }
    }

    pub fn perform_setup(&self, request: &PathRequest, graph: &dyn Graph, cache: &dyn Cache) -> Result<CalculationOptions> {
        if request.intents.is_empty() {
            return Err(Error::EmptyIntents);
        }

        let source_node = self.resolve_node(&request.ipv6_source_address, graph, cache, Error::SourceRouterNotFound)?;
        let destination_node = self.resolve_node(&request.ipv6_destination_address, graph, cache, Error::DestinationRouterNotFound)?;

        let selectors = Self::get_selectors(&request.intents)?;
        let objectives = &request.intents[selectors.offset..];
        let (weight_keys, calculation_mode) = Self::get_weight_keys_and_mode(objectives)?;

        let mut options = CalculationOptions::new(source_node, destination_node, weight_keys, calculation_mode);
        options.two_factor_weights = self.config.two_factor_weights;
        options.three_factor_weights = self.config.three_factor_weights;
        options.flex_algo = selectors.flex_algo;

        let (max_constraints, min_constraints) = Self::get_constraints(objectives);
        options.max_constraints = max_constraints;
        options.min_constraints = min_constraints;

        if let Some(sfc_intent) = selectors.sfc {
            options.service_function_chain = Some(self.get_service_function_chain(sfc_intent, selectors.flex_algo, graph, cache)?);
        }

        log::debug!(
            "Setup {} => {}: keys {:?}, mode {:?}, flex algo {}, sfc {}",
            options.source_node,
            options.destination_node,
            options.weight_keys,
            options.calculation_mode,
            options.flex_algo,
            options.service_function_chain.is_some()
        );

        Ok(options)
    }

    /// /64 network address of `address` -> router id from the cache -> node in the graph.
    fn resolve_node(&self, address: &str, graph: &dyn Graph, cache: &dyn Cache, not_found: fn(String) -> Error) -> Result<NodeId> {
        let network_address = get_network_address(address)?;

        let Some(router_id) = cache.get_router_id_from_network_address(&network_address) else {
            log::warn!("RouterNotFound: no router announces {} ({})", network_address, address);
            return Err(not_found(address.to_string()));
        };

        let node_id = NodeId::new(router_id);
        if !graph.node_exists(&node_id) {
            return Err(Error::NodeNotInGraph(node_id));
        }
        Ok(node_id)
    }

    /// An sfc intent may lead the request, a flex-algo intent may follow it or lead itself.
    fn get_selectors(intents: &[Intent]) -> Result<Selectors<'_>> {
        let mut selectors = Selectors { offset: 0, flex_algo: 0, sfc: None };

        if let Some(intent) = intents.first().filter(|intent| intent.intent_type == IntentType::Sfc) {
            selectors.sfc = Some(intent);
            selectors.offset += 1;
        }

        if let Some(intent) = intents.get(selectors.offset).filter(|intent| intent.intent_type == IntentType::FlexAlgo) {
            selectors.flex_algo = intent
                .get_flex_algo_number()
                .ok_or_else(|| Error::MissingIntentValue(format!("{} intent without a flex algo number", intent.intent_type)))?;
            selectors.offset += 1;
        }

        Ok(selectors)
    }

    /// Objective metrics of the intents left after the selectors.
    pub fn get_weight_keys_and_mode(objectives: &[Intent]) -> Result<(Vec<WeightKey>, CalculationMode)> {
        match objectives {
            [] => Ok((vec![WeightKey::IgpMetric], CalculationMode::Sum)),
            [intent] => Self::get_single_weight_key(intent.intent_type).map(|(key, mode)| (vec![key], mode)),
            intents if intents.len() <= 3 => {
                let keys = intents.iter().map(|intent| Self::get_normalized_weight_key(intent.intent_type)).collect::<Option<Vec<_>>>();

                keys.map(|keys| (keys, CalculationMode::Sum)).ok_or_else(|| Error::UndefinedWeightMapping(Self::describe(intents)))
            }
            intents => Err(Error::UndefinedWeightMapping(Self::describe(intents))),
        }
    }

    fn get_single_weight_key(intent_type: IntentType) -> Result<(WeightKey, CalculationMode)> {
        match intent_type {
            IntentType::LowLatency => Ok((WeightKey::Latency, CalculationMode::Sum)),
            IntentType::LowJitter => Ok((WeightKey::Jitter, CalculationMode::Sum)),
            IntentType::LowPacketLoss => Ok((WeightKey::PacketLoss, CalculationMode::Sum)),
            IntentType::HighBandwidth => Ok((WeightKey::AvailableBandwidth, CalculationMode::Max)),
            IntentType::LowBandwidth => Ok((WeightKey::MaximumLinkBandwidth, CalculationMode::Min)),
            IntentType::LowUtilization => Ok((WeightKey::UtilizedBandwidth, CalculationMode::Sum)),
            IntentType::FlexAlgo | IntentType::Sfc => Ok((WeightKey::IgpMetric, CalculationMode::Sum)),
        }
    }

    fn get_normalized_weight_key(intent_type: IntentType) -> Option<WeightKey> {
        match intent_type {
            IntentType::LowLatency => Some(WeightKey::NormalizedLatency),
            IntentType::LowJitter => Some(WeightKey::NormalizedJitter),
            IntentType::LowPacketLoss => Some(WeightKey::NormalizedPacketLoss),
            _ => None,
        }
    }

    fn describe(intents: &[Intent]) -> String {
        intents.iter().map(|intent| intent.intent_type.to_string()).collect::<Vec<_>>().join(", ")
    }

    pub fn get_constraints(objectives: &[Intent]) -> (HashMap<WeightKey, f64>, HashMap<WeightKey, f64>) {
        let mut max_constraints = HashMap::new();
        let mut min_constraints = HashMap::new();

        for intent in objectives {
            for value in &intent.values {
                match (intent.intent_type, value) {
                    (IntentType::LowLatency, IntentValue::MaxValue(max)) => {
                        max_constraints.insert(WeightKey::NormalizedLatency, *max);
                    }
                    (IntentType::LowJitter, IntentValue::MaxValue(max)) => {
                        max_constraints.insert(WeightKey::NormalizedJitter, *max);
                    }
                    (IntentType::LowPacketLoss, IntentValue::MaxValue(max)) => {
                        max_constraints.insert(WeightKey::NormalizedPacketLoss, *max / 100.0);
                    }
                    (_, IntentValue::MinValue(min)) => {
                        min_constraints.insert(WeightKey::AvailableBandwidth, *min);
                    }
                    (intent_type, IntentValue::MaxValue(max)) => {
                        log::warn!("Ignoring max value {} on intent {}", max, intent_type);
                    }
                    _ => {}
                }
            }
        }

        (max_constraints, min_constraints)
    }

    /// Candidate routers per service and every ordered combination of them.
    fn get_service_function_chain(
        &self,
        intent: &Intent,
        flex_algo: u32,
        graph: &dyn Graph,
        cache: &dyn Cache,
    ) -> Result<ServiceFunctionChainOptions> {
        let services = intent.get_service_names();
        if services.is_empty() {
            return Err(Error::MissingIntentValue(format!("{} intent without a service name", intent.intent_type)));
        }

        let mut service_sids: Vec<HashMap<NodeId, String>> = Vec::with_capacity(services.len());
        let mut candidates_per_service: Vec<Vec<NodeId>> = Vec::with_capacity(services.len());

        for service in services {
            let sids = cache.get_service_sids(service);
            if sids.is_empty() {
                log::warn!("NoServiceSids: service {} is not advertised", service);
                return Err(Error::NoServiceSids(service.to_string()));
            }

            let mut candidates: Vec<NodeId> = Vec::new();
            let mut sids_by_router: HashMap<NodeId, String> = HashMap::new();
            for sid in sids {
                let Some(router) = self.get_service_router(&sid, flex_algo, graph, cache) else {
                    continue;
                };
                // First advertised SID of this service wins on a router.
                if !sids_by_router.contains_key(&router) {
                    candidates.push(router.clone());
                    sids_by_router.insert(router, sid);
                }
            }

            if candidates.is_empty() {
                log::warn!("NoCompatibleServiceRouter: service {} for flex algo {}", service, flex_algo);
                return Err(Error::NoCompatibleServiceRouter { service: service.to_string(), algorithm: flex_algo });
            }
            candidates_per_service.push(candidates);
            service_sids.push(sids_by_router);
        }

        let sequences = cartesian_product(&candidates_per_service);
        log::debug!("Sfc: {} candidate sequences for {} services", sequences.len(), candidates_per_service.len());

        Ok(ServiceFunctionChainOptions { sequences, service_sids })
    }

    /// Router hosting a service SID, if it is in the graph and takes part in `flex_algo`.
    fn get_service_router(&self, sid: &str, flex_algo: u32, graph: &dyn Graph, cache: &dyn Cache) -> Option<NodeId> {
        let network_address = match get_network_address(sid) {
            Ok(address) => address,
            Err(e) => {
                log::warn!("Skipping service SID: {}", e);
                return None;
            }
        };

        let router = NodeId::new(cache.get_router_id_from_network_address(&network_address)?);
        let node = graph.get_node(&router)?;

        if node.supports_flex_algo(flex_algo) { Some(router) } else { None }
    }
}

fn cartesian_product(candidates: &[Vec<NodeId>]) -> Vec<Vec<NodeId>> {
    candidates.iter().fold(vec![Vec::new()], |sequences, routers| {
        sequences
            .iter()
            .flat_map(|prefix| {
                routers.iter().map(move |router| {
                    let mut sequence = prefix.clone();
                    sequence.push(router.clone());
                    sequence
                })
            })
            .collect()
    })
}
