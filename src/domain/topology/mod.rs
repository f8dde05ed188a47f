pub mod topology_event;
pub mod topology_processor;

pub use topology_event::{LinkEvent, NodeEvent, PrefixEvent, SidEvent, TopologyEvent};
pub use topology_processor::TopologyProcessor;
