use super::{TokenizeError, Tokenizer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use checkout_core::encoding::smart_glocal_tokenize_body;
use checkout_core::models::{
    CardEntry, NativeParams, NativeProvider, PaymentError, PaymentErrorKind, ProviderToken,
};
use checkout_core::validation::validate_for_smart_glocal;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Whether builds talk to the playground host when configuration is silent.
pub const STAGING_BY_DEFAULT: bool = cfg!(feature = "smartglocal-staging");

const PUBLIC_TOKEN_HEADER: &str = "X-PUBLIC-TOKEN";

pub fn base_url_for(host: &str) -> String {
    format!("https://{}", host)
}

#[derive(Clone)]
pub struct SmartGlocalClient {
    pub base_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct TokenizeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<TokenizeData>,
}

#[derive(Debug, Deserialize)]
struct TokenizeData {
    token: String,
}

impl SmartGlocalClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Arc<Self>> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create SmartGlocal HTTP client")?;

        Ok(Arc::new(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }))
    }

    fn tokenize_url(&self) -> String {
        format!("{}/cds/v1/tokenize/card", self.base_url)
    }
}

#[async_trait]
impl Tokenizer for SmartGlocalClient {
    fn provider(&self) -> NativeProvider {
        NativeProvider::SmartGlocal
    }

    async fn tokenize(
        &self,
        card: &CardEntry,
        params: &NativeParams,
        public_token: &str,
    ) -> Result<ProviderToken, TokenizeError> {
        let card = validate_for_smart_glocal(card, params)?;
        let provider = NativeProvider::SmartGlocal;

        let resp = self
            .http_client
            .post(self.tokenize_url())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(PUBLIC_TOKEN_HEADER, public_token)
            .json(&smart_glocal_tokenize_body(&card))
            .send()
            .await
            .map_err(|e| TokenizeError::from_reqwest(provider, e))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TokenizeError::from_reqwest(provider, e))?;
        // Error bodies have no documented shape; anything unreadable counts
        // as a refusal.
        let body: TokenizeResponse = serde_json::from_slice(&bytes).unwrap_or_default();

        if body.status.as_deref() != Some("ok") {
            tracing::info!(
                status = %status,
                provider_status = ?body.status,
                "SmartGlocal rejected card"
            );
            return Err(TokenizeError::Rejected {
                provider,
                error: PaymentError::new(PaymentErrorKind::Declined, "payment error"),
            });
        }

        let data = body.data.ok_or_else(|| TokenizeError::Malformed {
            provider,
            message: "status ok without data".to_string(),
        })?;

        tracing::info!("Card tokenized by SmartGlocal");
        Ok(ProviderToken {
            provider,
            token_type: "card".to_string(),
            id: data.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_endpoint_on_host() {
        let base = base_url_for("tgb-playground.smart-glocal.com");
        let client = SmartGlocalClient::new(base, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.tokenize_url(),
            "https://tgb-playground.smart-glocal.com/cds/v1/tokenize/card"
        );
    }
}
