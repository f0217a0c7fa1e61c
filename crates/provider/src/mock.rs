use super::{TokenizeError, Tokenizer};
use async_trait::async_trait;
use checkout_core::models::{CardEntry, NativeParams, NativeProvider, PaymentError, ProviderToken};
use checkout_core::validation::{validate_for_smart_glocal, validate_for_stripe};
use rand::{distributions::Alphanumeric, Rng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// In-process tokenizer: validates the card like the real client would, then
/// answers with a random token or a canned refusal.
pub struct MockTokenizer {
    provider: NativeProvider,
    refusal: Option<PaymentError>,
    latency: Duration,
    calls: AtomicUsize,
}

impl MockTokenizer {
    pub fn new(provider: NativeProvider) -> Arc<Self> {
        Arc::new(Self {
            provider,
            refusal: None,
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn refusing(provider: NativeProvider, error: PaymentError) -> Arc<Self> {
        Arc::new(Self {
            provider,
            refusal: Some(error),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_latency(provider: NativeProvider, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            provider,
            refusal: None,
            latency,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of tokenization calls that got past card validation.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tokenizer for MockTokenizer {
    fn provider(&self) -> NativeProvider {
        self.provider
    }

    async fn tokenize(
        &self,
        card: &CardEntry,
        params: &NativeParams,
        _public_credential: &str,
    ) -> Result<ProviderToken, TokenizeError> {
        match self.provider {
            NativeProvider::Stripe => {
                validate_for_stripe(card, params)?;
            }
            NativeProvider::SmartGlocal => {
                validate_for_smart_glocal(card, params)?;
            }
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        if let Some(error) = &self.refusal {
            return Err(TokenizeError::Rejected {
                provider: self.provider,
                error: error.clone(),
            });
        }

        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        Ok(ProviderToken {
            provider: self.provider,
            token_type: "card".to_string(),
            id: format!("tok_{}", id),
        })
    }
}
