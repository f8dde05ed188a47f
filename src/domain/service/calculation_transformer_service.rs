use crate::domain::cache::cache_trait::Cache;
use crate::domain::calculation::calculation_options::CalculationOptions;
use crate::domain::graph::topology::Graph;
use crate::domain::path::path::{Path, ServiceWaypoint};
use crate::domain::path::path_request::PathRequest;
use crate::domain::path::path_result::PathResult;

/// Turns a calculated [`Path`] into the SRv6 SID list handed to the client.
#[derive(Debug, Clone, Default)]
pub struct CalculationTransformerService;

impl CalculationTransformerService {
    pub fn new() -> Self {
        Self
    }

    /// `path` is `None` when the calculation found nothing; the result then degrades to
    /// the destination address as the only segment.
    pub fn transform_result(
        &self,
        request: &PathRequest,
        path: Option<Path>,
        options: &CalculationOptions,
        graph: &dyn Graph,
        cache: &dyn Cache,
    ) -> PathResult {
        let (sid_list, service_sid_list) = match &path {
            Some(path) => self.get_sid_lists(path, options.flex_algo, graph, cache),
            None => {
                log::info!("Degraded result for {} => {}", request.ipv6_source_address, request.ipv6_destination_address);
                (vec![request.ipv6_destination_address.clone()], Vec::new())
            }
        };

        PathResult::new(request, sid_list, service_sid_list, path, options.calculation_mode, options.weight_keys.clone(), options.flex_algo)
    }

    /// Locator SID of every router the path enters. Each service SID of a chain follows
    /// the locator of the hop that ends its leg, so a waypoint router visited in transit
    /// on another leg does not apply the service again.
    pub fn get_sid_lists(&self, path: &Path, flex_algo: u32, graph: &dyn Graph, cache: &dyn Cache) -> (Vec<String>, Vec<String>) {
        let mut sid_list = Vec::with_capacity(path.len() + path.service_waypoints.len());
        let mut service_sid_list = Vec::with_capacity(path.service_waypoints.len());
        let mut waypoints = path.service_waypoints.iter().peekable();

        // Services hosted on the source router lead the list.
        while let Some(waypoint) = waypoints.next_if(|waypoint| waypoint.position == 0) {
            Self::push_service_sid(waypoint, &mut sid_list, &mut service_sid_list);
        }

        for (index, edge_id) in path.edges.iter().enumerate() {
            match graph.get_edge(edge_id) {
                Some(edge) => match cache.get_sr_algorithm_sid(edge.to.as_str(), flex_algo) {
                    Some(sid) => sid_list.push(sid),
                    None => log::warn!("No locator SID for router {} and flex algo {}", edge.to, flex_algo),
                },
                None => log::warn!("Edge {} vanished while building the SID list", edge_id),
            }

            while let Some(waypoint) = waypoints.next_if(|waypoint| waypoint.position == index + 1) {
                Self::push_service_sid(waypoint, &mut sid_list, &mut service_sid_list);
            }
        }

        for waypoint in waypoints {
            log::warn!("Service SID {} at position {} lies beyond a path of {} hops", waypoint.sid, waypoint.position, path.len());
        }

        (sid_list, service_sid_list)
    }

    fn push_service_sid(waypoint: &ServiceWaypoint, sid_list: &mut Vec<String>, service_sid_list: &mut Vec<String>) {
        sid_list.push(waypoint.sid.clone());
        service_sid_list.push(waypoint.sid.clone());
    }
}
