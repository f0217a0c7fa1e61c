use crate::api::{
    PaymentFormResult, PaymentSubmission, PaymentsApi, PremiumPromoResult, SubmissionResponse,
    ValidatedInfo,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use checkout_core::models::{Chat, MessageId, ReceiptData, RequestInfo, RequestInputInvoice};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Scriptable backend. Each reply can be swapped at any time; every request
/// is recorded so callers can check what went over the wire.
pub struct MockPaymentsApi {
    payment_form: Mutex<Option<PaymentFormResult>>,
    validated_info: Mutex<Option<ValidatedInfo>>,
    submission: Mutex<std::result::Result<SubmissionResponse, String>>,
    receipt: Mutex<Option<ReceiptData>>,
    premium_promo: Mutex<Option<PremiumPromoResult>>,
    latency: Mutex<Duration>,
    invoice_requests: Mutex<Vec<RequestInputInvoice>>,
    submissions: Mutex<Vec<PaymentSubmission>>,
}

impl MockPaymentsApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            payment_form: Mutex::new(None),
            validated_info: Mutex::new(Some(ValidatedInfo {
                id: Some(uuid::Uuid::new_v4().to_string()),
                shipping_options: None,
            })),
            submission: Mutex::new(Ok(SubmissionResponse::Paid)),
            receipt: Mutex::new(None),
            premium_promo: Mutex::new(None),
            latency: Mutex::new(Duration::ZERO),
            invoice_requests: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        })
    }

    pub async fn set_payment_form(&self, reply: Option<PaymentFormResult>) {
        *self.payment_form.lock().await = reply;
    }

    pub async fn set_validated_info(&self, reply: Option<ValidatedInfo>) {
        *self.validated_info.lock().await = reply;
    }

    pub async fn set_submission(&self, reply: SubmissionResponse) {
        *self.submission.lock().await = Ok(reply);
    }

    /// Makes the next submissions fail at the transport level.
    pub async fn fail_submission(&self, message: &str) {
        *self.submission.lock().await = Err(message.to_string());
    }

    pub async fn set_receipt(&self, reply: Option<ReceiptData>) {
        *self.receipt.lock().await = reply;
    }

    pub async fn set_premium_promo(&self, reply: Option<PremiumPromoResult>) {
        *self.premium_promo.lock().await = reply;
    }

    /// Delay applied to every call, to let tests interleave operations.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.lock().await = latency;
    }

    pub async fn invoice_requests(&self) -> Vec<RequestInputInvoice> {
        self.invoice_requests.lock().await.clone()
    }

    pub async fn submissions(&self) -> Vec<PaymentSubmission> {
        self.submissions.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().await;
        if !latency.is_zero() {
            sleep(latency).await;
        }
    }
}

#[async_trait]
impl PaymentsApi for MockPaymentsApi {
    async fn get_payment_form(
        &self,
        input_invoice: &RequestInputInvoice,
    ) -> Result<Option<PaymentFormResult>> {
        self.invoice_requests.lock().await.push(input_invoice.clone());
        self.simulate_latency().await;
        Ok(self.payment_form.lock().await.clone())
    }

    async fn validate_requested_info(
        &self,
        input_invoice: &RequestInputInvoice,
        _request_info: &RequestInfo,
        _should_save: bool,
    ) -> Result<Option<ValidatedInfo>> {
        self.invoice_requests.lock().await.push(input_invoice.clone());
        self.simulate_latency().await;
        Ok(self.validated_info.lock().await.clone())
    }

    async fn send_payment_form(
        &self,
        submission: &PaymentSubmission,
    ) -> Result<SubmissionResponse> {
        self.submissions.lock().await.push(submission.clone());
        self.simulate_latency().await;
        self.submission.lock().await.clone().map_err(|m| anyhow!(m))
    }

    async fn get_receipt(
        &self,
        _chat: &Chat,
        _receipt_message_id: MessageId,
    ) -> Result<Option<ReceiptData>> {
        self.simulate_latency().await;
        Ok(self.receipt.lock().await.clone())
    }

    async fn fetch_premium_promo(&self) -> Result<Option<PremiumPromoResult>> {
        self.simulate_latency().await;
        Ok(self.premium_promo.lock().await.clone())
    }
}
