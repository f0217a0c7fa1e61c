use async_trait::async_trait;
use checkout_core::models::{
    CardEntry, NativeParams, NativeProvider, PaymentError, PaymentErrorKind, ProviderToken,
};
use checkout_core::validation::CardValidationError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error(transparent)]
    InvalidCard(#[from] CardValidationError),
    #[error("{provider} rejected the card: {error}")]
    Rejected {
        provider: NativeProvider,
        error: PaymentError,
    },
    #[error("request to {provider} timed out")]
    Timeout { provider: NativeProvider },
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: NativeProvider,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {provider}: {message}")]
    Malformed {
        provider: NativeProvider,
        message: String,
    },
}

impl TokenizeError {
    pub(crate) fn from_reqwest(provider: NativeProvider, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            TokenizeError::Timeout { provider }
        } else {
            TokenizeError::Transport { provider, source }
        }
    }
}

impl From<TokenizeError> for PaymentError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::InvalidCard(invalid) => invalid.into(),
            TokenizeError::Rejected { error, .. } => error,
            TokenizeError::Timeout { .. } => PaymentError::new(
                PaymentErrorKind::Timeout,
                "The payment provider did not respond in time",
            ),
            other @ (TokenizeError::Transport { .. } | TokenizeError::Malformed { .. }) => {
                PaymentError::new(PaymentErrorKind::Network, other.to_string())
            }
        }
    }
}

/// Turns raw card entry into an opaque provider token.
///
/// Implementations make exactly one outbound call per invocation, never retry
/// and never store anything; committing the token is the caller's job.
#[async_trait]
pub trait Tokenizer: Send + Sync {
    fn provider(&self) -> NativeProvider;

    async fn tokenize(
        &self,
        card: &CardEntry,
        params: &NativeParams,
        public_credential: &str,
    ) -> Result<ProviderToken, TokenizeError>;
}

/// Fixed mapping from a form's declared native provider to its client.
#[derive(Clone)]
pub struct ProviderRegistry {
    stripe: Arc<dyn Tokenizer>,
    smart_glocal: Arc<dyn Tokenizer>,
}

impl ProviderRegistry {
    pub fn new(stripe: Arc<dyn Tokenizer>, smart_glocal: Arc<dyn Tokenizer>) -> Self {
        Self {
            stripe,
            smart_glocal,
        }
    }

    pub fn client_for(&self, provider: NativeProvider) -> Arc<dyn Tokenizer> {
        match provider {
            NativeProvider::Stripe => Arc::clone(&self.stripe),
            NativeProvider::SmartGlocal => Arc::clone(&self.smart_glocal),
        }
    }
}

pub mod mock;
pub mod smartglocal;
pub mod stripe;
pub mod stripe_errors;
