use std::num::NonZero;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ConfluenceConfig, Enabled, Factor, FisherConfig, HullConfig, IndicatorConfig,
    IndicatorConfigBuilder, MacdConfig, PsarConfig, Threshold, WaddahConfig,
};

/// Flat parameter record, as a charting host hands it over.
///
/// Keys follow the host's camelCase names; every key is optional and
/// falls back to the host default. Values are unvalidated: convert with
/// [`ConfluenceConfig::try_from`] to get a usable config.
///
/// # Example
///
/// ```
/// use confluence_ta::{ConfluenceConfig, ConfluenceParams};
///
/// let params: ConfluenceParams =
///     serde_json::from_str(r#"{ "deadZone": 35, "tickSize": 0.1, "Fisher": false }"#).unwrap();
/// let config = ConfluenceConfig::try_from(params).unwrap();
///
/// assert_eq!(config.dead_zone().value(), 35.0);
/// assert!(!config.enabled().fisher);
/// assert_eq!(config.macd().fast_length(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfluenceParams {
    pub waddah_fast_length: usize,
    pub waddah_slow_length: usize,
    pub bb_length: usize,
    pub deviation: f64,
    pub sensitivity: f64,
    pub dead_zone: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub signal: usize,
    pub fisher_period: usize,
    pub hma_period: usize,
    pub psar_step: f64,
    pub psar_max_step: f64,
    pub dot_offset: f64,
    pub tick_size: f64,
    #[serde(rename = "MACD")]
    pub macd: bool,
    #[serde(rename = "PSAR")]
    pub psar: bool,
    #[serde(rename = "Fisher")]
    pub fisher: bool,
    #[serde(rename = "Waddah")]
    pub waddah: bool,
    #[serde(rename = "HMA")]
    pub hma: bool,
}

impl Default for ConfluenceParams {
    fn default() -> Self {
        ConfluenceConfig::default().into()
    }
}

fn period(parameter: &'static str, value: usize) -> Result<NonZero<usize>, ConfigError> {
    NonZero::new(value).ok_or(ConfigError::ZeroPeriod { parameter })
}

impl TryFrom<ConfluenceParams> for ConfluenceConfig {
    type Error = ConfigError;

    fn try_from(params: ConfluenceParams) -> Result<Self, Self::Error> {
        let waddah = WaddahConfig::builder()
            .fast_length(period("waddahFastLength", params.waddah_fast_length)?)
            .slow_length(period("waddahSlowLength", params.waddah_slow_length)?)
            .bb_length(period("bbLength", params.bb_length)?)
            .deviation(Factor::try_new("deviation", params.deviation)?)
            .sensitivity(Factor::try_new("sensitivity", params.sensitivity)?)
            .build();

        let macd = MacdConfig::builder()
            .fast_length(period("macdFast", params.macd_fast)?)
            .slow_length(period("macdSlow", params.macd_slow)?)
            .signal_length(period("signal", params.signal)?)
            .build();

        let fisher = FisherConfig::builder()
            .length(period("fisherPeriod", params.fisher_period)?)
            .tick_size(Factor::try_new("tickSize", params.tick_size)?)
            .build();

        let hull = HullConfig::close(period("hmaPeriod", params.hma_period)?);

        let step = Factor::try_new("psarStep", params.psar_step)?;
        let max_step = Factor::try_new("psarMaxStep", params.psar_max_step)?;
        if max_step.value() < step.value() {
            return Err(ConfigError::MaxStepBelowStep {
                step: step.value(),
                max_step: max_step.value(),
            });
        }
        let psar = PsarConfig::builder().step(step).max_step(max_step).build();

        Ok(ConfluenceConfig::builder()
            .waddah(waddah)
            .macd(macd)
            .fisher(fisher)
            .hull(hull)
            .psar(psar)
            .dead_zone(Threshold::try_new("deadZone", params.dead_zone)?)
            .dot_offset(Threshold::try_new("dotOffset", params.dot_offset)?)
            .enabled(Enabled {
                macd: params.macd,
                psar: params.psar,
                fisher: params.fisher,
                waddah: params.waddah,
                hma: params.hma,
            })
            .build())
    }
}

impl From<ConfluenceConfig> for ConfluenceParams {
    fn from(config: ConfluenceConfig) -> Self {
        let (waddah, macd, fisher, psar) =
            (config.waddah(), config.macd(), config.fisher(), config.psar());
        let enabled = config.enabled();

        Self {
            waddah_fast_length: waddah.fast_length(),
            waddah_slow_length: waddah.slow_length(),
            bb_length: waddah.bb_length(),
            deviation: waddah.deviation().value(),
            sensitivity: waddah.sensitivity().value(),
            dead_zone: config.dead_zone().value(),
            macd_fast: macd.fast_length(),
            macd_slow: macd.slow_length(),
            signal: macd.signal_length(),
            fisher_period: fisher.length(),
            hma_period: config.hull().length(),
            psar_step: psar.step().value(),
            psar_max_step: psar.max_step().value(),
            dot_offset: config.dot_offset().value(),
            tick_size: fisher.tick_size().value(),
            macd: enabled.macd,
            psar: enabled.psar,
            fisher: enabled.fisher,
            waddah: enabled.waddah,
            hma: enabled.hma,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ConfluenceParams {
        serde_json::from_str(json).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn empty_object_is_host_defaults() {
            let params = parse("{}");
            assert_eq!(params, ConfluenceParams::default());
            assert_eq!(params.waddah_fast_length, 20);
            assert_eq!(params.sensitivity, 150.0);
            assert_eq!(params.psar_max_step, 0.2);
            assert!(params.macd && params.psar && params.fisher && params.waddah && params.hma);
        }

        #[test]
        fn reads_host_key_names() {
            let params = parse(
                r#"{
                    "waddahFastLength": 12,
                    "waddahSlowLength": 26,
                    "bbLength": 18,
                    "deviation": 2.5,
                    "sensitivity": 100,
                    "deadZone": 15,
                    "macdFast": 5,
                    "macdSlow": 13,
                    "signal": 9,
                    "fisherPeriod": 8,
                    "hmaPeriod": 21,
                    "psarStep": 0.01,
                    "psarMaxStep": 0.1,
                    "dotOffset": 4,
                    "tickSize": 0.01,
                    "MACD": false,
                    "PSAR": true,
                    "Fisher": false,
                    "Waddah": true,
                    "HMA": false
                }"#,
            );
            let config = ConfluenceConfig::try_from(params).unwrap();

            assert_eq!(config.waddah().fast_length(), 12);
            assert_eq!(config.waddah().slow_length(), 26);
            assert_eq!(config.waddah().bb_length(), 18);
            assert_eq!(config.waddah().deviation().value(), 2.5);
            assert_eq!(config.waddah().sensitivity().value(), 100.0);
            assert_eq!(config.dead_zone().value(), 15.0);
            assert_eq!(config.macd().signal_length(), 9);
            assert_eq!(config.fisher().length(), 8);
            assert_eq!(config.hull().length(), 21);
            assert_eq!(config.psar().step().value(), 0.01);
            assert_eq!(config.dot_offset().value(), 4.0);
            assert_eq!(config.tick_size().value(), 0.01);
            assert_eq!(
                config.enabled(),
                Enabled {
                    macd: false,
                    psar: true,
                    fisher: false,
                    waddah: true,
                    hma: false,
                }
            );
        }

        #[test]
        fn serializes_with_host_key_names() {
            let json = serde_json::to_value(ConfluenceParams::default()).unwrap();
            assert_eq!(json["waddahFastLength"], 20);
            assert_eq!(json["dotOffset"], 10.0);
            assert_eq!(json["HMA"], true);
            assert!(json.get("hma").is_none());
        }

        #[test]
        fn survives_json_round_trip() {
            let config = ConfluenceConfig::default();
            let json = serde_json::to_string(&ConfluenceParams::from(config)).unwrap();
            let back = ConfluenceConfig::try_from(parse(&json)).unwrap();
            assert_eq!(back, config);
        }
    }

    mod validation {
        use super::*;

        fn convert(json: &str) -> Result<ConfluenceConfig, ConfigError> {
            ConfluenceConfig::try_from(parse(json))
        }

        #[test]
        fn zero_period() {
            assert_eq!(
                convert(r#"{ "hmaPeriod": 0 }"#),
                Err(ConfigError::ZeroPeriod {
                    parameter: "hmaPeriod"
                })
            );
        }

        #[test]
        fn non_positive_factor() {
            assert_eq!(
                convert(r#"{ "deviation": 0 }"#),
                Err(ConfigError::NonPositiveFactor {
                    parameter: "deviation",
                    value: 0.0
                })
            );
            assert!(matches!(
                convert(r#"{ "tickSize": -0.25 }"#),
                Err(ConfigError::NonPositiveFactor {
                    parameter: "tickSize",
                    ..
                })
            ));
        }

        #[test]
        fn negative_dead_zone() {
            assert_eq!(
                convert(r#"{ "deadZone": -5 }"#),
                Err(ConfigError::Negative {
                    parameter: "deadZone",
                    value: -5.0
                })
            );
        }

        #[test]
        fn zero_dead_zone_is_allowed() {
            let config = convert(r#"{ "deadZone": 0, "dotOffset": 0 }"#).unwrap();
            assert_eq!(config.dead_zone().value(), 0.0);
            assert_eq!(config.marker_offset(), 0.0);
        }

        #[test]
        fn max_step_below_step() {
            assert_eq!(
                convert(r#"{ "psarStep": 0.3, "psarMaxStep": 0.2 }"#),
                Err(ConfigError::MaxStepBelowStep {
                    step: 0.3,
                    max_step: 0.2
                })
            );
        }

        #[test]
        fn negative_period_is_a_parse_error() {
            let result: Result<ConfluenceParams, _> = serde_json::from_str(r#"{ "signal": -1 }"#);
            assert!(result.is_err());
        }
    }
}
