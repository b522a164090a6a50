use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{Result, SnowballError};
use crate::parse::NumberFormat;
use crate::types::SETTLED_EPSILON;

/// strategy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// balances at or below this are settled
    pub settled_epsilon: Money,
    /// projection gives up after this many months
    pub max_projection_months: u32,
    /// add monthly interest to balances during projection
    pub accrue_interest: bool,
    /// separator convention for user-entered amounts
    pub number_format: NumberFormat,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            settled_epsilon: SETTLED_EPSILON,
            max_projection_months: 600, // 50 years
            accrue_interest: true,
            number_format: NumberFormat::Auto,
        }
    }
}

impl StrategyConfig {
    /// configuration for balances that never accrue interest
    pub fn without_interest() -> Self {
        Self {
            accrue_interest: false,
            ..Self::default()
        }
    }

    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    pub fn with_settled_epsilon(mut self, epsilon: Money) -> Self {
        self.settled_epsilon = epsilon;
        self
    }

    pub fn with_max_projection_months(mut self, months: u32) -> Self {
        self.max_projection_months = months;
        self
    }

    /// load from json, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            SnowballError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settled_epsilon.is_negative() {
            return Err(SnowballError::InvalidConfiguration {
                message: format!("settled_epsilon must not be negative, got {}", self.settled_epsilon),
            });
        }
        if self.max_projection_months == 0 {
            return Err(SnowballError::InvalidConfiguration {
                message: "max_projection_months must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = StrategyConfig::default();
        assert_eq!(config.settled_epsilon, Money::from_decimal(dec!(0.01)));
        assert!(config.accrue_interest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = StrategyConfig::from_json(
            r#"{ "accrue_interest": false, "number_format": "Continental" }"#,
        )
        .unwrap();

        assert!(!config.accrue_interest);
        assert_eq!(config.number_format, NumberFormat::Continental);
        assert_eq!(config.max_projection_months, 600);
    }

    #[test]
    fn test_from_json_money_as_string() {
        let config = StrategyConfig::from_json(r#"{ "settled_epsilon": "0.5" }"#).unwrap();
        assert_eq!(config.settled_epsilon, Money::from_decimal(dec!(0.5)));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(StrategyConfig::from_json(r#"{ "max_projection_months": 0 }"#).is_err());
        assert!(StrategyConfig::from_json(r#"{ "settled_epsilon": "-1" }"#).is_err());
        assert!(StrategyConfig::from_json("not json").is_err());
    }
}
