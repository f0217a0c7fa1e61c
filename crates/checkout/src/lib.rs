pub mod api;
pub mod directory;
pub mod journal;
pub mod mock;
pub mod orchestrator;
pub mod outcome;
pub mod telemetry;

pub use orchestrator::{Checkout, PremiumModalRequest};
pub use outcome::{Outcome, Skipped};

use anyhow::Result;
use api::PaymentsApi;
use config::CheckoutConfig;
use directory::ChatDirectory;
use journal::Journal;
use provider::{smartglocal, smartglocal::SmartGlocalClient, stripe::StripeClient, ProviderRegistry};
use std::sync::Arc;
use store::PaymentStateStore;

/// Provider clients for the configured endpoints and timeout.
pub fn create_provider_registry(cfg: &CheckoutConfig) -> Result<ProviderRegistry> {
    let timeout = cfg.timeouts.provider();

    let stripe = StripeClient::new(cfg.providers.stripe_api_base.clone(), timeout)?;

    let sg_host = cfg
        .providers
        .smart_glocal
        .host(smartglocal::STAGING_BY_DEFAULT);
    tracing::info!(host = %sg_host, "Using SmartGlocal tokenize host");
    let smart_glocal = SmartGlocalClient::new(smartglocal::base_url_for(sg_host), timeout)?;

    Ok(ProviderRegistry::new(stripe, smart_glocal))
}

impl Checkout {
    /// Wires a checkout with a fresh store and the providers, journal and
    /// timeouts from `cfg`.
    pub fn from_config(
        cfg: &CheckoutConfig,
        api: Arc<dyn PaymentsApi>,
        directory: Arc<dyn ChatDirectory>,
    ) -> Result<Self> {
        let providers = create_provider_registry(cfg)?;
        let journal = match &cfg.journal.path {
            Some(path) => Journal::to_file(path.clone()),
            None => Journal::disabled(),
        };
        Ok(Checkout::new(
            Arc::new(PaymentStateStore::new()),
            api,
            directory,
            providers,
        )
        .with_journal(journal)
        .with_submit_timeout(cfg.timeouts.submit()))
    }
}
