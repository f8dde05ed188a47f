use crate::config::HawkEyeConfig;
use crate::domain::cache::cache_trait::Cache;
use crate::domain::cache::network_cache::NetworkCache;
use crate::domain::calculation::calculation_options::CalculationOptions;
use crate::domain::calculation::sfc_calculation::ServiceFunctionChainCalculation;
use crate::domain::calculation::shortest_path_calculation::ShortestPathCalculation;
use crate::domain::graph::topology::{NetworkGraph, Topology};
use crate::domain::path::path::Path;
use crate::domain::path::path_request::PathRequest;
use crate::domain::path::path_result::PathResult;
use crate::domain::service::calculation_setup_provider::CalculationSetupProvider;
use crate::domain::service::calculation_transformer_service::CalculationTransformerService;
use crate::domain::service::calculation_updater_service::CalculationUpdaterService;
use crate::domain::session::stream_session::StreamSession;
use crate::error::{Error, Result};

/// Entry point of the engine: setup, calculation and transformation of one request.
///
/// Graph and cache are locked, in that order, for the whole sequence. The topology
/// processor takes the locks in the same order.
#[derive(Debug, Clone)]
pub struct CalculationManager {
    graph: NetworkGraph,
    cache: NetworkCache,
    setup_provider: CalculationSetupProvider,
    transformer: CalculationTransformerService,
    updater: CalculationUpdaterService,
}

impl CalculationManager {
    pub fn new(graph: NetworkGraph, cache: NetworkCache, config: HawkEyeConfig) -> Self {
        Self {
            graph,
            cache,
            setup_provider: CalculationSetupProvider::new(config),
            transformer: CalculationTransformerService::new(),
            updater: CalculationUpdaterService::new(config),
        }
    }

    pub fn get_graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn get_cache(&self) -> &NetworkCache {
        &self.cache
    }

    /// Best path for a request. A request without any feasible path yields a degraded result, not an error.
    pub fn calculate_best_path(&self, request: &PathRequest) -> Result<PathResult> {
        let topology = self.graph.lock();
        let cache = self.cache.lock();

        let (result, _) = self.calculate_locked(request, &topology, &*cache)?;
        Ok(result)
    }

    /// Recalculates the path of an open session and lets the updater decide whether it is replaced.
    pub fn calculate_path_update(&self, session: &mut StreamSession) -> Result<Option<PathResult>> {
        let topology = self.graph.lock();
        let cache = self.cache.lock();

        let (result, graph) = self.calculate_locked(session.get_request(), &topology, &*cache)?;
        self.updater.update_session(session, result, graph, &*cache)
    }

    /// Returns the result together with the (sub)graph it was calculated on.
    fn calculate_locked<'t>(&self, request: &PathRequest, topology: &'t Topology, cache: &dyn Cache) -> Result<(PathResult, &'t Topology)> {
        let options = self.setup_provider.perform_setup(request, topology, cache)?;
        let graph = Self::select_graph(topology, options.flex_algo)?;

        let path = match Self::calculate(graph, &options) {
            Ok(path) => Some(path),
            Err(Error::PathNotFound { from, to }) => {
                log::info!("NoPathFound: {} => {} for intents {:?}", from, to, request.intents);
                None
            }
            Err(e) => return Err(e),
        };

        Ok((self.transformer.transform_result(request, path, &options, graph, cache), graph))
    }

    fn select_graph(topology: &Topology, flex_algo: u32) -> Result<&Topology> {
        if flex_algo == 0 {
            return Ok(topology);
        }
        topology.get_sub_graph(flex_algo).ok_or(Error::SubGraphNotFound(flex_algo))
    }

    fn calculate(graph: &Topology, options: &CalculationOptions) -> Result<Path> {
        match &options.service_function_chain {
            Some(sfc) => ServiceFunctionChainCalculation::new(graph, options, sfc).execute(),
            None => ShortestPathCalculation::new(graph, options, options.source_node.clone(), options.destination_node.clone()).execute(),
        }
    }
}
