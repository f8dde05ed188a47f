pub mod edge;
pub mod node;
pub mod topology;
pub mod weight_key;

pub use edge::NetworkEdge;
pub use node::NetworkNode;
pub use topology::{Graph, NetworkGraph, Topology};
pub use weight_key::WeightKey;
