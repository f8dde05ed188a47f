pub mod cache;
pub mod calculation;
pub mod graph;
pub mod intent;
pub mod path;
pub mod service;
pub mod session;
pub mod topology;
pub mod utils;
