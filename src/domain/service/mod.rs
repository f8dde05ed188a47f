pub mod calculation_manager;
pub mod calculation_setup_provider;
pub mod calculation_transformer_service;
pub mod calculation_updater_service;

pub use calculation_manager::CalculationManager;
pub use calculation_setup_provider::CalculationSetupProvider;
pub use calculation_transformer_service::CalculationTransformerService;
pub use calculation_updater_service::CalculationUpdaterService;
