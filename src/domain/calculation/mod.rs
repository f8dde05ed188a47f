pub mod calculation_mode;
pub mod calculation_options;
pub mod edge_weight;
pub mod priority_queue;
pub mod sfc_calculation;
pub mod shortest_path_calculation;

pub use calculation_mode::CalculationMode;
pub use calculation_options::{CalculationOptions, ServiceFunctionChainOptions};
pub use edge_weight::EdgeWeightCalculator;
pub use priority_queue::IndexedPriorityQueue;
pub use sfc_calculation::ServiceFunctionChainCalculation;
pub use shortest_path_calculation::{ShortestPathCalculation, SourceNodeMetrics};
