use super::{stripe_errors, TokenizeError, Tokenizer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use checkout_core::encoding::stripe_token_params;
use checkout_core::models::{CardEntry, NativeParams, NativeProvider, ProviderToken};
use checkout_core::validation::validate_for_stripe;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Client for Stripe's card token endpoint, authenticated with the
/// publishable key handed out with the payment form.
#[derive(Clone)]
pub struct StripeClient {
    pub base_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "type")]
    token_type: Option<String>,
    id: Option<String>,
    error: Option<stripe_errors::StripeApiError>,
}

impl StripeClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Arc<Self>> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create Stripe HTTP client")?;

        Ok(Arc::new(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }))
    }

    fn tokens_url(&self) -> String {
        format!("{}/v1/tokens", self.base_url)
    }
}

#[async_trait]
impl Tokenizer for StripeClient {
    fn provider(&self) -> NativeProvider {
        NativeProvider::Stripe
    }

    async fn tokenize(
        &self,
        card: &CardEntry,
        params: &NativeParams,
        publishable_key: &str,
    ) -> Result<ProviderToken, TokenizeError> {
        let card = validate_for_stripe(card, params)?;
        let provider = NativeProvider::Stripe;

        // Stripe takes the card as query parameters on an empty form POST.
        let resp = self
            .http_client
            .post(self.tokens_url())
            .query(&stripe_token_params(&card))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(AUTHORIZATION, format!("Bearer {}", publishable_key))
            .send()
            .await
            .map_err(|e| TokenizeError::from_reqwest(provider, e))?;

        // Declines come back as 4xx with an `error` body, so the status alone
        // says nothing; the body decides.
        let status = resp.status();
        let token_resp: TokenResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                TokenizeError::Timeout { provider }
            } else {
                TokenizeError::Malformed {
                    provider,
                    message: format!("HTTP {}: {}", status, e),
                }
            }
        })?;

        if let Some(error) = token_resp.error {
            let error = stripe_errors::normalize(&error);
            tracing::info!(
                status = %status,
                field = ?error.field,
                "Stripe rejected card"
            );
            return Err(TokenizeError::Rejected { provider, error });
        }

        match (token_resp.token_type, token_resp.id) {
            (Some(token_type), Some(id)) => {
                tracing::info!(token_type = %token_type, "Card tokenized by Stripe");
                Ok(ProviderToken {
                    provider,
                    token_type,
                    id,
                })
            }
            _ => Err(TokenizeError::Malformed {
                provider,
                message: format!("HTTP {}: token response without type or id", status),
            }),
        }
    }
}
