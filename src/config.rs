//! TOML configuration for providers, the loyalty programme and logging.
//!
//! Every section is optional and falls back to the sandbox defaults. A provider
//! is registered unless its section sets `enabled = false`.

use crate::domain::customer::{LoyaltyTier, LoyaltyTiers};
use crate::error::Result;
use crate::infrastructure::providers::{VnPayConfig, ZaloPayConfig};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub vnpay: VnPayConfig,
    pub zalopay: ZaloPayConfig,
    pub loyalty: LoyaltyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            vnpay: VnPayConfig::default(),
            zalopay: ZaloPayConfig::default(),
            loyalty: LoyaltyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoyaltyConfig {
    pub tiers: Vec<LoyaltyTier>,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                LoyaltyTier::new("Silver", 0),
                LoyaltyTier::new("Gold", 500),
                LoyaltyTier::new("Platinum", 2000),
            ],
        }
    }
}

impl LoyaltyConfig {
    pub fn tiers(&self) -> LoyaltyTiers {
        LoyaltyTiers::new(self.tiers.clone())
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
