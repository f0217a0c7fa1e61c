use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const APP_NAME: &str = "payment-checkout";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_stripe_api_base")]
    pub stripe_api_base: String,
    #[serde(default)]
    pub smart_glocal: SmartGlocalConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            stripe_api_base: default_stripe_api_base(),
            smart_glocal: SmartGlocalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartGlocalConfig {
    #[serde(default = "default_sg_production_host")]
    pub production_host: String,
    #[serde(default = "default_sg_staging_host")]
    pub staging_host: String,
    /// `None` defers to how the provider crate was built.
    pub staging: Option<bool>,
}

impl Default for SmartGlocalConfig {
    fn default() -> Self {
        Self {
            production_host: default_sg_production_host(),
            staging_host: default_sg_staging_host(),
            staging: None,
        }
    }
}

impl SmartGlocalConfig {
    pub fn host(&self, staging_by_default: bool) -> &str {
        if self.staging.unwrap_or(staging_by_default) {
            &self.staging_host
        } else {
            &self.production_host
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_provider_secs")]
    pub provider_secs: u64,
    #[serde(default = "default_submit_secs")]
    pub submit_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            provider_secs: default_provider_secs(),
            submit_secs: default_submit_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn provider(&self) -> Duration {
        Duration::from_secs(self.provider_secs)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_secs(self.submit_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalConfig {
    /// JSONL file that receives checkout transitions; unset keeps them in the log only.
    pub path: Option<PathBuf>,
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_sg_production_host() -> String {
    "tgb.smart-glocal.com".to_string()
}

fn default_sg_staging_host() -> String {
    "tgb-playground.smart-glocal.com".to_string()
}

fn default_provider_secs() -> u64 {
    20
}

fn default_submit_secs() -> u64 {
    30
}

pub fn load() -> Result<CheckoutConfig> {
    let cfg: CheckoutConfig =
        confy::load(APP_NAME, None).context("Failed to load checkout config")?;
    Ok(cfg)
}

pub fn store(cfg: &CheckoutConfig) -> Result<()> {
    confy::store(APP_NAME, None, cfg).context("Failed to store checkout config")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gets_defaults() {
        let cfg: CheckoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.providers.stripe_api_base, "https://api.stripe.com");
        assert_eq!(cfg.timeouts.provider(), Duration::from_secs(20));
        assert_eq!(cfg.timeouts.submit(), Duration::from_secs(30));
        assert!(cfg.journal.path.is_none());
    }

    #[test]
    fn smart_glocal_host_override() {
        let mut sg = SmartGlocalConfig::default();
        assert_eq!(sg.host(false), "tgb.smart-glocal.com");
        assert_eq!(sg.host(true), "tgb-playground.smart-glocal.com");

        sg.staging = Some(false);
        assert_eq!(sg.host(true), "tgb.smart-glocal.com");
    }
}
