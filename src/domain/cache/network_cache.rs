use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::cache::cache_trait::Cache;
use crate::domain::utils::network_address::get_network_address;

/// Plain lookup tables fed by prefix and SID advertisements.
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    /// /64 network address -> router id.
    network_addresses: HashMap<String, String>,

    /// (router id, algorithm) -> locator SID.
    algorithm_sids: HashMap<(String, u32), String>,

    /// Service name -> SIDs in advertisement order.
    service_sids: IndexMap<String, IndexSet<String>>,

    /// Service SID -> service name.
    sid_services: HashMap<String, String>,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    //-----------------------
    // --- Prefix Methods ---
    //-----------------------
    pub fn store_network_address(&mut self, network_address: impl Into<String>, router_id: impl Into<String>) {
        let network_address = network_address.into();
        let router_id = router_id.into();
        log::trace!("Cache: prefix {} announced by {}", network_address, router_id);
        self.network_addresses.insert(network_address, router_id);
    }

    pub fn remove_network_address(&mut self, network_address: &str) -> Option<String> {
        self.network_addresses.remove(network_address)
    }

    //--------------------
    // --- SID Methods ---
    //--------------------
    pub fn store_sr_algorithm_sid(&mut self, router_id: impl Into<String>, algorithm: u32, sid: impl Into<String>) {
        self.algorithm_sids.insert((router_id.into(), algorithm), sid.into());
    }

    /// Removes the locator SID of a router, but only if it is still the one given.
    pub fn remove_sr_algorithm_sid(&mut self, router_id: &str, algorithm: u32, sid: &str) -> bool {
        let key = (router_id.to_string(), algorithm);
        if self.algorithm_sids.get(&key).is_some_and(|stored| stored == sid) {
            self.algorithm_sids.remove(&key);
            return true;
        }
        false
    }

    /// Forgets a router that left the topology: its locator SIDs, the service SIDs inside
    /// its networks and finally the networks themselves.
    pub fn remove_router(&mut self, router_id: &str) {
        let hosted: Vec<String> = self
            .sid_services
            .keys()
            .filter(|sid| {
                get_network_address(sid).is_ok_and(|network| self.network_addresses.get(&network).is_some_and(|router| router == router_id))
            })
            .cloned()
            .collect();
        for sid in hosted {
            log::debug!("Cache: service SID {} withdrawn with router {}", sid, router_id);
            self.remove_service_sid(&sid);
        }

        self.algorithm_sids.retain(|(router, _), _| router != router_id);
        self.network_addresses.retain(|_, router| router != router_id);
    }

    //------------------------
    // --- Service Methods ---
    //------------------------
    pub fn store_service_sid(&mut self, service_name: impl Into<String>, sid: impl Into<String>) {
        let service_name = service_name.into();
        let sid = sid.into();

        log::trace!("Cache: service {} offered at {}", service_name, sid);
        self.sid_services.insert(sid.clone(), service_name.clone());
        self.service_sids.entry(service_name).or_default().insert(sid);
    }

    pub fn remove_service_sid(&mut self, sid: &str) -> bool {
        let Some(service_name) = self.sid_services.remove(sid) else {
            return false;
        };

        if let Some(sids) = self.service_sids.get_mut(&service_name) {
            sids.shift_remove(sid);
            if sids.is_empty() {
                self.service_sids.shift_remove(&service_name);
            }
        }
        true
    }

    pub fn get_service_names(&self) -> Vec<&str> {
        self.service_sids.keys().map(String::as_str).collect()
    }
}

impl Cache for CacheState {
    fn get_router_id_from_network_address(&self, network_address: &str) -> Option<String> {
        self.network_addresses.get(network_address).cloned()
    }

    fn get_sr_algorithm_sid(&self, router_id: &str, algorithm: u32) -> Option<String> {
        self.algorithm_sids.get(&(router_id.to_string(), algorithm)).cloned()
    }

    fn get_service_sids(&self, service_name: &str) -> Vec<String> {
        self.service_sids.get(service_name).map(|sids| sids.iter().cloned().collect()).unwrap_or_default()
    }

    fn does_service_sid_exist(&self, sid: &str) -> bool {
        self.sid_services.contains_key(sid)
    }
}

/// Shared handle to the live cache, locked together with the graph for every calculation.
#[derive(Debug, Clone, Default)]
pub struct NetworkCache {
    inner: Arc<Mutex<CacheState>>,
}

impl NetworkCache {
    pub fn new(state: CacheState) -> Self {
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    pub fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().expect("Cache mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_sids_keep_advertisement_order() {
        let mut cache = CacheState::new();
        cache.store_service_sid("fw", "fc00:0:3::f");
        cache.store_service_sid("fw", "fc00:0:2::f");
        cache.store_service_sid("fw", "fc00:0:3::f");

        assert_eq!(cache.get_service_sids("fw"), vec!["fc00:0:3::f".to_string(), "fc00:0:2::f".to_string()]);
        assert!(cache.does_service_sid_exist("fc00:0:2::f"));
    }

    #[test]
    fn test_removing_last_sid_drops_service() {
        let mut cache = CacheState::new();
        cache.store_service_sid("ids", "fc00:0:5::1");

        assert!(cache.remove_service_sid("fc00:0:5::1"));
        assert!(!cache.remove_service_sid("fc00:0:5::1"));
        assert!(cache.get_service_sids("ids").is_empty());
        assert!(cache.get_service_names().is_empty());
    }

    #[test]
    fn test_stale_locator_withdrawal_is_ignored() {
        let mut cache = CacheState::new();
        cache.store_sr_algorithm_sid("r1", 128, "fc00:0:1:80::");
        cache.store_sr_algorithm_sid("r1", 128, "fc00:0:1:81::");

        assert!(!cache.remove_sr_algorithm_sid("r1", 128, "fc00:0:1:80::"));
        assert_eq!(cache.get_sr_algorithm_sid("r1", 128).as_deref(), Some("fc00:0:1:81::"));
    }

    #[test]
    fn test_remove_router_clears_prefixes_and_locators() {
        let mut cache = CacheState::new();
        cache.store_network_address("2001:db8:1::", "r1");
        cache.store_sr_algorithm_sid("r1", 0, "fc00:0:1::");

        cache.remove_router("r1");
        assert_eq!(cache.get_router_id_from_network_address("2001:db8:1::"), None);
        assert_eq!(cache.get_sr_algorithm_sid("r1", 0), None);
    }

    #[test]
    fn test_remove_router_withdraws_its_services() {
        let mut cache = CacheState::new();
        cache.store_network_address("fc00:0:1::", "r1");
        cache.store_network_address("fc00:0:2::", "r2");
        cache.store_service_sid("fw", "fc00:0:1::f");
        cache.store_service_sid("fw", "fc00:0:2::f");
        cache.store_service_sid("ids", "fc00:0:1::1");

        cache.remove_router("r1");

        assert!(!cache.does_service_sid_exist("fc00:0:1::f"));
        assert!(!cache.does_service_sid_exist("fc00:0:1::1"));
        assert_eq!(cache.get_service_sids("fw"), vec!["fc00:0:2::f".to_string()]);
        assert_eq!(cache.get_service_names(), vec!["fw"]);
    }
}
