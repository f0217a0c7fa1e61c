//! Contract of the primary backend. The transport behind it lives outside
//! this crate; implementations return `Ok(None)` when the backend answered
//! without a usable payload and `Err` when the call itself failed.

use anyhow::Result;
use async_trait::async_trait;
use checkout_core::models::{
    Chat, Invoice, MessageId, PaymentForm, PremiumPromo, ReceiptData, RequestInfo,
    RequestInputInvoice, ShippingOption, User,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFormResult {
    pub form: PaymentForm,
    pub invoice: Invoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedInfo {
    pub id: Option<String>,
    pub shipping_options: Option<Vec<ShippingOption>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentCredentials {
    pub save: bool,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSubmission {
    pub input_invoice: RequestInputInvoice,
    pub form_id: String,
    pub credentials: PaymentCredentials,
    pub requested_info_id: Option<String>,
    pub shipping_option_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionResponse {
    /// The backend answered with a literal success.
    Paid,
    /// Anything else, including an empty answer.
    Unconfirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumPromoResult {
    pub promo: PremiumPromo,
    pub users: Vec<User>,
}

#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn get_payment_form(
        &self,
        input_invoice: &RequestInputInvoice,
    ) -> Result<Option<PaymentFormResult>>;

    async fn validate_requested_info(
        &self,
        input_invoice: &RequestInputInvoice,
        request_info: &RequestInfo,
        should_save: bool,
    ) -> Result<Option<ValidatedInfo>>;

    async fn send_payment_form(&self, submission: &PaymentSubmission) -> Result<SubmissionResponse>;

    async fn get_receipt(
        &self,
        chat: &Chat,
        receipt_message_id: MessageId,
    ) -> Result<Option<ReceiptData>>;

    async fn fetch_premium_promo(&self) -> Result<Option<PremiumPromoResult>>;
}
