use anyhow::Result;
use chrono::Utc;
use checkout_core::models::PaymentError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use store::CheckoutState;

/// One checkout transition. Carries identifiers and status only; card data and
/// provider tokens never reach the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: String,
    pub event_type: String,
    pub generation: u64,
    pub step: Option<String>,
    pub status: Option<String>,
    pub form_id: Option<String>,
    pub provider: Option<String>,
    pub error: Option<String>,
}

impl JournalEntry {
    pub fn new(event_type: &str, state: &CheckoutState) -> Self {
        let payment = &state.payment;
        Self {
            timestamp: Utc::now().to_rfc3339(),
            event_type: event_type.to_string(),
            generation: state.generation,
            step: payment.step.map(|s| s.as_str().to_string()),
            status: payment.status.map(|s| s.as_str().to_string()),
            form_id: payment.form_id().map(str::to_string),
            provider: payment.native_provider.map(|p| p.as_str().to_string()),
            error: None,
        }
    }

    pub fn with_error(mut self, error: &PaymentError) -> Self {
        self.error = Some(error.description.clone());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Journal {
    path: Option<PathBuf>,
}

impl Journal {
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn record(&self, entry: &JournalEntry) {
        tracing::debug!(
            event_type = %entry.event_type,
            generation = entry.generation,
            status = ?entry.status,
            "Checkout transition"
        );
        if let Err(e) = self.append(entry) {
            tracing::warn!(error = %e, "Failed to write checkout journal");
        }
    }

    fn append(&self, entry: &JournalEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}
