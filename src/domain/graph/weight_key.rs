use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one metric carried by a [`NetworkEdge`](super::edge::NetworkEdge).
///
/// Raw metrics are stored as reported by the network. The three normalized variants
/// are rescaled to `0..=1` so that different metrics can be blended in one weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKey {
    /// Unidirectional link delay in microseconds.
    Latency,
    /// Unidirectional delay variation in microseconds.
    Jitter,
    /// Unidirectional packet loss in percent.
    PacketLoss,
    IgpMetric,
    MaximumLinkBandwidth,
    AvailableBandwidth,
    UtilizedBandwidth,
    NormalizedLatency,
    NormalizedJitter,
    NormalizedPacketLoss,
}

impl WeightKey {
    pub const NORMALIZED: [WeightKey; 3] = [WeightKey::NormalizedLatency, WeightKey::NormalizedJitter, WeightKey::NormalizedPacketLoss];

    /// Returns the normalized counterpart of a raw metric, if one exists.
    pub fn normalized(&self) -> Option<WeightKey> {
        match self {
            WeightKey::Latency => Some(WeightKey::NormalizedLatency),
            WeightKey::Jitter => Some(WeightKey::NormalizedJitter),
            WeightKey::PacketLoss => Some(WeightKey::NormalizedPacketLoss),
            _ => None,
        }
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeightKey::Latency => "latency",
            WeightKey::Jitter => "jitter",
            WeightKey::PacketLoss => "packet_loss",
            WeightKey::IgpMetric => "igp_metric",
            WeightKey::MaximumLinkBandwidth => "maximum_link_bandwidth",
            WeightKey::AvailableBandwidth => "available_bandwidth",
            WeightKey::UtilizedBandwidth => "utilized_bandwidth",
            WeightKey::NormalizedLatency => "normalized_latency",
            WeightKey::NormalizedJitter => "normalized_jitter",
            WeightKey::NormalizedPacketLoss => "normalized_packet_loss",
        };
        write!(f, "{}", name)
    }
}
