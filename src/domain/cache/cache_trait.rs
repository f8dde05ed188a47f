/// Lookup capability the engine needs from the topology cache.
///
/// Implemented by [`CacheState`](super::network_cache::CacheState) for production use
/// and by lightweight mocks in tests.
pub trait Cache {
    /// Returns the router id announcing the given /64 network address.
    fn get_router_id_from_network_address(&self, network_address: &str) -> Option<String>;

    /// Returns the SRv6 locator SID of a router for a flexible algorithm.
    fn get_sr_algorithm_sid(&self, router_id: &str, algorithm: u32) -> Option<String>;

    /// Returns every SID currently advertised for a service, in advertisement order.
    fn get_service_sids(&self, service_name: &str) -> Vec<String>;

    fn does_service_sid_exist(&self, sid: &str) -> bool;
}
