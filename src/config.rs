use crate::error::{Error, Result};

pub const FLAPPING_THRESHOLD_ENV: &str = "HAWKEYE_FLAPPING_THRESHOLD";
pub const TWO_FACTOR_WEIGHTS_ENV: &str = "HAWKEYE_TWO_FACTOR_WEIGHTS";
pub const THREE_FACTOR_WEIGHTS_ENV: &str = "HAWKEYE_THREE_FACTOR_WEIGHTS";

const DEFAULT_FLAPPING_THRESHOLD: f64 = 0.1;
const DEFAULT_TWO_FACTOR_WEIGHTS: [f64; 2] = [0.7, 0.3];
const DEFAULT_THREE_FACTOR_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Tunables of the path computation engine.
///
/// Read once at process start and handed to the services that need them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HawkEyeConfig {
    /// Minimum relative improvement before an applied path is replaced (0.1 = 10 %).
    pub flapping_threshold: f64,

    /// Blend factors when two metrics are optimized together.
    pub two_factor_weights: [f64; 2],

    /// Blend factors when three metrics are optimized together.
    pub three_factor_weights: [f64; 3],
}

impl Default for HawkEyeConfig {
    fn default() -> Self {
        Self {
            flapping_threshold: DEFAULT_FLAPPING_THRESHOLD,
            two_factor_weights: DEFAULT_TWO_FACTOR_WEIGHTS,
            three_factor_weights: DEFAULT_THREE_FACTOR_WEIGHTS,
        }
    }
}

impl HawkEyeConfig {
    /// Reads overrides from the process environment.
    ///
    /// * `HAWKEYE_FLAPPING_THRESHOLD`: e.g. `0.2`
    /// * `HAWKEYE_TWO_FACTOR_WEIGHTS`: e.g. `0.6,0.4`
    /// * `HAWKEYE_THREE_FACTOR_WEIGHTS`: e.g. `0.4,0.4,0.2`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HawkEyeConfig::default();

        if let Some(raw) = lookup(FLAPPING_THRESHOLD_ENV) {
            let threshold: f64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfiguration(format!("{} is not a number: '{}'", FLAPPING_THRESHOLD_ENV, raw)))?;

            if !(0.0..1.0).contains(&threshold) {
                return Err(Error::InvalidConfiguration(format!("{} must be within [0, 1), got {}", FLAPPING_THRESHOLD_ENV, threshold)));
            }
            config.flapping_threshold = threshold;
        }

        if let Some(raw) = lookup(TWO_FACTOR_WEIGHTS_ENV) {
            config.two_factor_weights = parse_factor_weights(TWO_FACTOR_WEIGHTS_ENV, &raw)?;
        }

        if let Some(raw) = lookup(THREE_FACTOR_WEIGHTS_ENV) {
            config.three_factor_weights = parse_factor_weights(THREE_FACTOR_WEIGHTS_ENV, &raw)?;
        }

        log::info!(
            "Configuration loaded: flapping threshold {}, two factor weights {:?}, three factor weights {:?}",
            config.flapping_threshold,
            config.two_factor_weights,
            config.three_factor_weights
        );

        Ok(config)
    }
}

fn parse_factor_weights<const N: usize>(key: &str, raw: &str) -> Result<[f64; N]> {
    let mut weights = Vec::with_capacity(N);

    for part in raw.split(',') {
        let weight: f64 =
            part.trim().parse().map_err(|_| Error::InvalidConfiguration(format!("{} contains a non numeric weight: '{}'", key, part)))?;

        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidConfiguration(format!("{} weights must be finite and non-negative, got {}", key, weight)));
        }
        weights.push(weight);
    }

    let count = weights.len();
    <[f64; N]>::try_from(weights).map_err(|_| Error::InvalidConfiguration(format!("{} expects {} weights, got {}", key, N, count)))
}
