pub mod id;
pub mod network_address;
