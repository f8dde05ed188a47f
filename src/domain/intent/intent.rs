use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentType {
    LowLatency,
    LowJitter,
    LowPacketLoss,
    HighBandwidth,
    LowBandwidth,
    LowUtilization,
    /// Restricts the calculation to the subgraph of one flexible algorithm.
    FlexAlgo,
    /// Service function chain: the path must traverse the named services in order.
    Sfc,
}

impl FromStr for IntentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low-latency" => Ok(IntentType::LowLatency),
            "low-jitter" => Ok(IntentType::LowJitter),
            "low-packet-loss" => Ok(IntentType::LowPacketLoss),
            "high-bandwidth" => Ok(IntentType::HighBandwidth),
            "low-bandwidth" => Ok(IntentType::LowBandwidth),
            "low-utilization" => Ok(IntentType::LowUtilization),
            "flex-algo" => Ok(IntentType::FlexAlgo),
            "sfc" => Ok(IntentType::Sfc),
            _ => Err(Error::UnknownIntentType(s.to_string())),
        }
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentType::LowLatency => "low-latency",
            IntentType::LowJitter => "low-jitter",
            IntentType::LowPacketLoss => "low-packet-loss",
            IntentType::HighBandwidth => "high-bandwidth",
            IntentType::LowBandwidth => "low-bandwidth",
            IntentType::LowUtilization => "low-utilization",
            IntentType::FlexAlgo => "flex-algo",
            IntentType::Sfc => "sfc",
        };
        write!(f, "{}", name)
    }
}

/// One parameter of an intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentValue {
    /// Lower bound, applied to the available bandwidth of every link.
    MinValue(f64),
    /// Upper bound on the normalized metric of the intent.
    MaxValue(f64),
    FlexAlgoNumber(u32),
    ServiceName(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    pub intent_type: IntentType,
    pub values: Vec<IntentValue>,
}

impl Intent {
    pub fn new(intent_type: IntentType, values: Vec<IntentValue>) -> Self {
        Self { intent_type, values }
    }

    pub fn of(intent_type: IntentType) -> Self {
        Self { intent_type, values: Vec::new() }
    }

    pub fn get_flex_algo_number(&self) -> Option<u32> {
        self.values.iter().find_map(|value| match value {
            IntentValue::FlexAlgoNumber(number) => Some(*number),
            _ => None,
        })
    }

    pub fn get_service_names(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter_map(|value| match value {
                IntentValue::ServiceName(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
