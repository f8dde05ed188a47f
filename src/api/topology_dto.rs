use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::graph::weight_key::WeightKey;
use crate::domain::topology::topology_event::{LinkEvent, NodeEvent, PrefixEvent, SidEvent, TopologyEvent};

/// Topology snapshot as exported from the topology gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDto {
    #[serde(default)]
    pub nodes: Vec<NodeDto>,
    #[serde(default)]
    pub links: Vec<LinkDto>,
    #[serde(default)]
    pub prefixes: Vec<PrefixDto>,
    #[serde(default)]
    pub sids: Vec<SidDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub router_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flex_algos: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    /// Defaults to `{localRouter}-{remoteRouter}`.
    pub id: Option<String>,
    pub local_router: String,
    pub remote_router: String,

    pub igp_metric: Option<f64>,
    pub latency: Option<f64>,
    pub jitter: Option<f64>,
    pub packet_loss: Option<f64>,
    pub maximum_link_bandwidth: Option<f64>,
    pub available_bandwidth: Option<f64>,
    pub utilized_bandwidth: Option<f64>,

    pub normalized_latency: Option<f64>,
    pub normalized_jitter: Option<f64>,
    pub normalized_packet_loss: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PrefixDto {
    pub router_id: String,
    /// Address or network, with or without a `/len` suffix.
    pub prefix: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SidDto {
    pub router_id: String,
    pub sid: String,
    #[serde(default)]
    pub algorithm: u32,
    pub service_name: Option<String>,
}

impl LinkDto {
    pub fn get_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| format!("{}-{}", self.local_router, self.remote_router))
    }

    pub fn get_weights(&self) -> HashMap<WeightKey, f64> {
        [
            (WeightKey::IgpMetric, self.igp_metric),
            (WeightKey::Latency, self.latency),
            (WeightKey::Jitter, self.jitter),
            (WeightKey::PacketLoss, self.packet_loss),
            (WeightKey::MaximumLinkBandwidth, self.maximum_link_bandwidth),
            (WeightKey::AvailableBandwidth, self.available_bandwidth),
            (WeightKey::UtilizedBandwidth, self.utilized_bandwidth),
            (WeightKey::NormalizedLatency, self.normalized_latency),
            (WeightKey::NormalizedJitter, self.normalized_jitter),
            (WeightKey::NormalizedPacketLoss, self.normalized_packet_loss),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

impl TopologyDto {
    /// The snapshot as a batch of add events: nodes first, so every link finds its endpoints.
    pub fn into_events(self) -> Vec<TopologyEvent> {
        let mut events = Vec::with_capacity(self.nodes.len() + self.links.len() + self.prefixes.len() + self.sids.len());

        for node in self.nodes {
            events.push(TopologyEvent::NodeAdded(NodeEvent { router_id: node.router_id, name: node.name, flex_algos: node.flex_algos }));
        }

        for link in self.links {
            let id = link.get_id();
            let weights = link.get_weights();
            events.push(TopologyEvent::LinkAdded(LinkEvent { id, local_router: link.local_router, remote_router: link.remote_router, weights }));
        }

        for prefix in self.prefixes {
            let address = prefix.prefix.split('/').next().unwrap_or_default().to_string();
            events.push(TopologyEvent::PrefixAdded(PrefixEvent { router_id: prefix.router_id, prefix: address }));
        }

        for sid in self.sids {
            events.push(TopologyEvent::SidAdded(SidEvent {
                router_id: sid.router_id,
                sid: sid.sid,
                algorithm: sid.algorithm,
                service_name: sid.service_name,
            }));
        }

        events
    }
}
