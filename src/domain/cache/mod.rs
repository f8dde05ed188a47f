pub mod cache_trait;
pub mod network_cache;

pub use cache_trait::Cache;
pub use network_cache::{CacheState, NetworkCache};
