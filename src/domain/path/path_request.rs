use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::domain::intent::{Intent, IntentType};

/// A client request for a path satisfying an ordered list of intents.
///
/// The cancellation token is the lifetime of the client stream. Once it is cancelled
/// the open session belonging to the request is dropped.
#[derive(Debug, Clone, Serialize)]
pub struct PathRequest {
    pub ipv6_source_address: String,
    pub ipv6_destination_address: String,
    pub intents: Vec<Intent>,

    #[serde(skip)]
    cancellation_token: CancellationToken,
}

impl PathRequest {
    pub fn new(ipv6_source_address: impl Into<String>, ipv6_destination_address: impl Into<String>, intents: Vec<Intent>) -> Self {
        Self::with_cancellation_token(ipv6_source_address, ipv6_destination_address, intents, CancellationToken::new())
    }

    pub fn with_cancellation_token(
        ipv6_source_address: impl Into<String>,
        ipv6_destination_address: impl Into<String>,
        intents: Vec<Intent>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            ipv6_source_address: ipv6_source_address.into(),
            ipv6_destination_address: ipv6_destination_address.into(),
            intents,
            cancellation_token,
        }
    }

    /// Identity of the request by value: addresses and intents, never the stream.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{}|{}|{:?}", self.ipv6_source_address, self.ipv6_destination_address, self.intents))
    }

    pub fn get_cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    pub fn first_intent_type(&self) -> Option<IntentType> {
        self.intents.first().map(|intent| intent.intent_type)
    }
}
