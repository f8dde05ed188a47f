use serde::{Deserialize, Serialize};

use crate::domain::calculation::calculation_mode::CalculationMode;
use crate::domain::graph::weight_key::WeightKey;
use crate::domain::intent::{Intent, IntentType, IntentValue};
use crate::domain::path::path_request::PathRequest;
use crate::domain::path::path_result::PathResult;
use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PathRequestDto {
    pub ipv6_source_address: String,
    pub ipv6_destination_address: String,
    pub intents: Vec<IntentDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IntentDto {
    /// e.g. `low-latency`, `flex-algo`, `sfc`.
    #[serde(rename = "type")]
    pub intent_type: String,
    #[serde(default)]
    pub values: Vec<ValueDto>,
}

/// `min-value`, `max-value` and `flex-algo-number` carry `number`, `service-name` carries `string`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValueDto {
    #[serde(rename = "type")]
    pub value_type: String,
    pub number: Option<f64>,
    pub string: Option<String>,
}

impl TryFrom<ValueDto> for IntentValue {
    type Error = Error;

    fn try_from(dto: ValueDto) -> Result<Self, Self::Error> {
        let number = || dto.number.ok_or_else(|| Error::InvalidIntentValue(format!("{} without a number", dto.value_type)));

        match dto.value_type.as_str() {
            "min-value" => Ok(IntentValue::MinValue(number()?)),
            "max-value" => Ok(IntentValue::MaxValue(number()?)),
            "flex-algo-number" => {
                let value = number()?;
                if value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
                    return Err(Error::InvalidIntentValue(format!("flex algo number {}", value)));
                }
                Ok(IntentValue::FlexAlgoNumber(value as u32))
            }
            "service-name" => match dto.string {
                Some(name) if !name.is_empty() => Ok(IntentValue::ServiceName(name)),
                _ => Err(Error::InvalidIntentValue("service-name without a string".to_string())),
            },
            other => Err(Error::UnknownValueType(other.to_string())),
        }
    }
}

impl TryFrom<IntentDto> for Intent {
    type Error = Error;

    fn try_from(dto: IntentDto) -> Result<Self, Self::Error> {
        let intent_type: IntentType = dto.intent_type.parse()?;
        let values = dto.values.into_iter().map(IntentValue::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Intent::new(intent_type, values))
    }
}

impl TryFrom<PathRequestDto> for PathRequest {
    type Error = Error;

    fn try_from(dto: PathRequestDto) -> Result<Self, Self::Error> {
        let intents = dto.intents.into_iter().map(Intent::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(PathRequest::new(dto.ipv6_source_address, dto.ipv6_destination_address, intents))
    }
}

/// What the transport layer sends back to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PathResultDto {
    pub ipv6_source_address: String,
    pub ipv6_destination_address: String,
    pub sid_list: Vec<String>,
    pub service_sid_list: Vec<String>,
    pub degraded: bool,

    pub edges: Vec<String>,
    pub total_cost: Option<f64>,
    pub total_delay: Option<f64>,
    pub total_jitter: Option<f64>,
    pub total_packet_loss: Option<f64>,
    pub bottleneck_edge: Option<String>,
    pub bottleneck_value: Option<f64>,

    pub calculation_mode: CalculationMode,
    pub weight_keys: Vec<WeightKey>,
    pub flex_algo: u32,
}

impl From<&PathResult> for PathResultDto {
    fn from(result: &PathResult) -> Self {
        let path = result.path.as_ref();

        Self {
            ipv6_source_address: result.ipv6_source_address.clone(),
            ipv6_destination_address: result.ipv6_destination_address.clone(),
            sid_list: result.sid_list.clone(),
            service_sid_list: result.service_sid_list.clone(),
            degraded: result.is_degraded(),
            edges: path.map(|path| path.edges.iter().map(|edge| edge.to_string()).collect()).unwrap_or_default(),
            total_cost: path.map(|path| path.total_cost),
            total_delay: path.map(|path| path.total_delay),
            total_jitter: path.map(|path| path.total_jitter),
            total_packet_loss: path.map(|path| path.total_packet_loss),
            bottleneck_edge: path.and_then(|path| path.bottleneck_edge.as_ref().map(|edge| edge.to_string())),
            bottleneck_value: path.map(|path| path.bottleneck_value).filter(|value| value.is_finite()),
            calculation_mode: result.calculation_mode,
            weight_keys: result.weight_keys.clone(),
            flex_algo: result.flex_algo,
        }
    }
}
