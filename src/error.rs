use thiserror::Error;

use crate::domain::graph::weight_key::WeightKey;
use crate::domain::utils::id::{EdgeId, NodeId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON input: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // Setup errors, raised before any graph traversal.
    #[error("No intents were provided with the path request")]
    EmptyIntents,

    #[error("Source router for address {0} could not be resolved")]
    SourceRouterNotFound(String),

    #[error("Destination router for address {0} could not be resolved")]
    DestinationRouterNotFound(String),

    #[error("Router {0} is not part of the graph")]
    NodeNotInGraph(NodeId),

    #[error("No weight mapping defined for intents: {0}")]
    UndefinedWeightMapping(String),

    #[error("Intent is missing a required value: {0}")]
    MissingIntentValue(String),

    #[error("No SIDs are advertised for service {0}")]
    NoServiceSids(String),

    #[error("No router hosting service {service} supports flexible algorithm {algorithm}")]
    NoCompatibleServiceRouter { service: String, algorithm: u32 },

    #[error("No subgraph exists for flexible algorithm {0}")]
    SubGraphNotFound(u32),

    // Calculation results.
    #[error("No path found between {from} and {to}")]
    PathNotFound { from: NodeId, to: NodeId },

    #[error("Edge {0} referenced by an applied path no longer exists")]
    StaleTopology(EdgeId),

    // Graph mutation.
    #[error("Node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("Edge {0} does not exist")]
    EdgeNotFound(EdgeId),

    #[error("Edge {edge} references missing node {node}")]
    EdgeEndpointMissing { edge: EdgeId, node: NodeId },

    #[error("Edge {edge} carries no weight for {key}")]
    WeightNotFound { edge: EdgeId, key: WeightKey },

    // Conversion from the exchange format.
    #[error("Invalid IPv6 address: {0}")]
    InvalidAddress(String),

    #[error("Unknown intent type: {0}")]
    UnknownIntentType(String),

    #[error("Unknown intent value type: {0}")]
    UnknownValueType(String),

    #[error("Invalid intent value: {0}")]
    InvalidIntentValue(String),
}

impl Error {
    /// Errors that abort a calculation before the graph is traversed.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyIntents
                | Error::SourceRouterNotFound(_)
                | Error::DestinationRouterNotFound(_)
                | Error::NodeNotInGraph(_)
                | Error::UndefinedWeightMapping(_)
                | Error::MissingIntentValue(_)
                | Error::NoServiceSids(_)
                | Error::NoCompatibleServiceRouter { .. }
                | Error::SubGraphNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
