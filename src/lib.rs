use tokio::sync::mpsc;

use crate::api::topology_dto::TopologyDto;
use crate::config::HawkEyeConfig;
use crate::domain::cache::network_cache::NetworkCache;
use crate::domain::graph::topology::NetworkGraph;
use crate::domain::service::calculation_manager::CalculationManager;
use crate::domain::topology::topology_processor::TopologyProcessor;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Builds graph, cache and manager from a topology snapshot file.
///
/// The returned processor shares graph and cache with the manager and signals
/// `update_tx` after every applied batch of topology events.
pub fn build_engine(topology_path: &str, config: HawkEyeConfig, update_tx: mpsc::Sender<()>) -> Result<(CalculationManager, TopologyProcessor)> {
    let snapshot: TopologyDto = parse_json_file(topology_path)?;
    log::info!(
        "Topology snapshot parsed: {} nodes, {} links, {} prefixes, {} sids",
        snapshot.nodes.len(),
        snapshot.links.len(),
        snapshot.prefixes.len(),
        snapshot.sids.len()
    );

    let graph = NetworkGraph::default();
    let cache = NetworkCache::default();

    // The snapshot is applied before anyone listens for updates.
    TopologyProcessor::new(graph.clone(), cache.clone()).process_events(snapshot.into_events());
    log::info!("Subgraphs built for flex algos {:?}", graph.lock().get_sub_graph_algorithms());

    let manager = CalculationManager::new(graph.clone(), cache.clone(), config);
    let processor = TopologyProcessor::with_update_signal(graph, cache, update_tx);

    Ok((manager, processor))
}
