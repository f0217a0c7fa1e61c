use crate::api::{PaymentCredentials, PaymentSubmission, PaymentsApi, SubmissionResponse};
use crate::directory::ChatDirectory;
use crate::journal::{Journal, JournalEntry};
use crate::outcome::{Outcome, Skipped};
use checkout_core::models::{
    CardEntry, ChatId, InputInvoice, MessageId, PaymentError, PaymentErrorKind, PaymentStatus,
    PaymentStep, Receipt, RequestInfo, RequestInputInvoice, UserId,
};
use provider::ProviderRegistry;
use std::sync::Arc;
use std::time::Duration;
use store::{CheckoutState, PaymentStateStore, PremiumModal, SessionEvent};

const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default)]
pub struct PremiumModalRequest {
    pub initial_section: Option<String>,
    pub from_user_id: Option<UserId>,
    pub is_success: bool,
}

/// Drives the checkout state machine.
///
/// Every operation reads a fresh snapshot, awaits at most one external call,
/// then commits through the store. Commits made after a network call are
/// tied to the session generation they started from, so a response that
/// outlives its checkout is dropped instead of resurrecting it.
pub struct Checkout {
    store: Arc<PaymentStateStore>,
    api: Arc<dyn PaymentsApi>,
    directory: Arc<dyn ChatDirectory>,
    providers: ProviderRegistry,
    journal: Journal,
    submit_timeout: Duration,
}

impl Checkout {
    pub fn new(
        store: Arc<PaymentStateStore>,
        api: Arc<dyn PaymentsApi>,
        directory: Arc<dyn ChatDirectory>,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            store,
            api,
            directory,
            providers,
            journal: Journal::disabled(),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<PaymentStateStore> {
        &self.store
    }

    fn resolve(&self, input_invoice: &InputInvoice) -> Result<RequestInputInvoice, Skipped> {
        match input_invoice {
            InputInvoice::Slug { slug } => Ok(RequestInputInvoice::Slug { slug: slug.clone() }),
            InputInvoice::Message {
                chat_id,
                message_id,
            } => {
                let chat = self
                    .directory
                    .chat(chat_id)
                    .ok_or_else(|| Skipped::UnknownChat(chat_id.clone()))?;
                Ok(RequestInputInvoice::Message {
                    chat,
                    message_id: *message_id,
                })
            }
        }
    }

    fn record(&self, event_type: &str, state: &CheckoutState) {
        self.journal.record(&JournalEntry::new(event_type, state));
    }

    fn skip(&self, operation: &'static str, reason: Skipped) -> Outcome {
        tracing::debug!(operation, reason = %reason, "Checkout operation skipped");
        Outcome::Skipped(reason)
    }

    async fn commit(&self, event_type: &str, events: Vec<SessionEvent>) -> Outcome {
        let state = self.store.apply(events).await;
        self.record(event_type, &state);
        Outcome::Applied
    }

    pub async fn open_invoice(&self, input_invoice: InputInvoice) -> Outcome {
        let request_invoice = match self.resolve(&input_invoice) {
            Ok(r) => r,
            Err(reason) => return self.skip("open_invoice", reason),
        };

        let result = match self.api.get_payment_form(&request_invoice).await {
            Ok(Some(result)) => result,
            Ok(None) => return self.skip("open_invoice", Skipped::EmptyResult),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch payment form");
                return self.skip("open_invoice", Skipped::EmptyResult);
            }
        };

        let step = result.invoice.initial_step();
        tracing::info!(
            form_id = %result.form.form_id,
            provider = ?result.form.native_provider,
            step = step.as_str(),
            "Invoice opened"
        );
        self.commit(
            "invoice_opened",
            vec![
                SessionEvent::Opened { input_invoice },
                SessionEvent::FormSet(result.form),
                SessionEvent::InvoiceSet(result.invoice),
                SessionEvent::StepSet(step),
            ],
        )
        .await
    }

    pub async fn validate_requested_info(&self, request_info: RequestInfo, save: bool) -> Outcome {
        let snapshot = self.store.snapshot().await;
        let Some(input_invoice) = snapshot.payment.input_invoice.as_ref() else {
            return self.skip(
                "validate_requested_info",
                Skipped::PreconditionMissing("input invoice"),
            );
        };
        let request_invoice = match self.resolve(input_invoice) {
            Ok(r) => r,
            Err(reason) => return self.skip("validate_requested_info", reason),
        };

        let validated = match self
            .api
            .validate_requested_info(&request_invoice, &request_info, save)
            .await
        {
            Ok(Some(validated)) => validated,
            Ok(None) => return self.skip("validate_requested_info", Skipped::EmptyResult),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to validate requested info");
                return self.skip("validate_requested_info", Skipped::EmptyResult);
            }
        };
        let Some(id) = validated.id else {
            return self.skip("validate_requested_info", Skipped::EmptyResult);
        };

        let mut events = vec![SessionEvent::RequestInfoIdSet(id)];
        match validated.shipping_options {
            Some(options) => {
                tracing::info!(
                    options = options.len(),
                    "Requested info accepted, shipping required"
                );
                events.push(SessionEvent::ShippingOptionsSet(options));
                events.push(SessionEvent::StepSet(PaymentStep::Shipping));
            }
            None => {
                tracing::info!("Requested info accepted");
                events.push(SessionEvent::StepSet(PaymentStep::PaymentInfo));
            }
        }

        match self
            .store
            .apply_if_current(snapshot.generation, events)
            .await
        {
            Some(state) => {
                self.record("requested_info_validated", &state);
                Outcome::Applied
            }
            None => self.skip("validate_requested_info", Skipped::StaleSession),
        }
    }

    /// Tokenizes the card with the form's native provider. The raw card only
    /// lives for the duration of this call.
    pub async fn send_credentials_info(&self, card: CardEntry) -> Outcome {
        let snapshot = self.store.snapshot().await;
        let payment = &snapshot.payment;
        let Some(provider) = payment.native_provider else {
            return self.skip(
                "send_credentials_info",
                Skipped::PreconditionMissing("native provider"),
            );
        };
        let (Some(form), Some(public_credential)) =
            (payment.form.as_ref(), payment.public_credential())
        else {
            return self.skip(
                "send_credentials_info",
                Skipped::PreconditionMissing("provider public credential"),
            );
        };

        let client = self.providers.client_for(provider);
        let result = client
            .tokenize(&card, &form.native_params, public_credential)
            .await;
        drop(card);

        match result {
            Ok(token) => {
                let events = vec![
                    SessionEvent::ProviderTokenSet(token),
                    SessionEvent::StepSet(PaymentStep::Checkout),
                ];
                match self.store.apply_if_current(snapshot.generation, events).await {
                    Some(state) => {
                        tracing::info!(provider = %provider, "Card credentials accepted");
                        self.record("credentials_tokenized", &state);
                        Outcome::Applied
                    }
                    None => self.skip("send_credentials_info", Skipped::StaleSession),
                }
            }
            Err(e) => {
                tracing::info!(provider = %provider, error = %e, "Card tokenization failed");
                let error = PaymentError::from(e);
                self.fail(
                    "send_credentials_info",
                    snapshot.generation,
                    "tokenization_failed",
                    error,
                )
                .await
            }
        }
    }

    async fn fail(
        &self,
        operation: &'static str,
        generation: u64,
        event_type: &str,
        error: PaymentError,
    ) -> Outcome {
        let events = vec![
            SessionEvent::StatusSet(PaymentStatus::Failed),
            SessionEvent::ErrorSet(error.clone()),
        ];
        match self.store.apply_if_current(generation, events).await {
            Some(state) => {
                self.journal
                    .record(&JournalEntry::new(event_type, &state).with_error(&error));
                Outcome::Failed(error)
            }
            None => self.skip(operation, Skipped::StaleSession),
        }
    }

    pub async fn send_payment_form(
        &self,
        shipping_option_id: Option<String>,
        save_credentials: bool,
    ) -> Outcome {
        let snapshot = self.store.snapshot().await;
        let payment = &snapshot.payment;

        let (Some(input_invoice), Some(_), Some(form_id), Some(_)) = (
            payment.input_invoice.as_ref(),
            payment.public_credential(),
            payment.form_id(),
            payment.native_provider,
        ) else {
            return self.skip(
                "send_payment_form",
                Skipped::PreconditionMissing("invoice, form or provider"),
            );
        };
        let Some(token) = payment.provider_token.as_ref() else {
            return self.skip(
                "send_payment_form",
                Skipped::PreconditionMissing("provider token"),
            );
        };
        if payment.status == Some(PaymentStatus::Pending) {
            return self.skip("send_payment_form", Skipped::AlreadyPending);
        }

        let request_invoice = match self.resolve(input_invoice) {
            Ok(r) => r,
            Err(reason) => return self.skip("send_payment_form", reason),
        };

        let submission = PaymentSubmission {
            input_invoice: request_invoice,
            form_id: form_id.to_string(),
            credentials: PaymentCredentials {
                save: save_credentials,
                data: token.credentials_data(),
            },
            requested_info_id: payment.request_info_id.clone(),
            shipping_option_id,
        };

        // The buyer sees the spinner before the backend has answered.
        let generation = snapshot.generation;
        let pending = self
            .store
            .apply_if(
                |s| s.generation == generation && s.payment.status != Some(PaymentStatus::Pending),
                [SessionEvent::StatusSet(PaymentStatus::Pending)],
            )
            .await;
        match pending {
            Some(state) => self.record("submission_started", &state),
            None => {
                let reason = if self.store.generation().await == generation {
                    Skipped::AlreadyPending
                } else {
                    Skipped::StaleSession
                };
                return self.skip("send_payment_form", reason);
            }
        }

        let response =
            tokio::time::timeout(self.submit_timeout, self.api.send_payment_form(&submission))
                .await;

        match response {
            Ok(Ok(SubmissionResponse::Paid)) => {
                let events = vec![
                    SessionEvent::Cleared,
                    SessionEvent::StatusSet(PaymentStatus::Paid),
                    SessionEvent::ModalClosed,
                ];
                match self.store.apply_if_current(generation, events).await {
                    Some(state) => {
                        tracing::info!(form_id = %submission.form_id, "Payment completed");
                        self.record("payment_completed", &state);
                        Outcome::Applied
                    }
                    None => self.skip("send_payment_form", Skipped::StaleSession),
                }
            }
            Ok(Ok(SubmissionResponse::Unconfirmed)) => {
                tracing::warn!(
                    form_id = %submission.form_id,
                    "Payment submission was not confirmed, leaving status pending"
                );
                Outcome::Pending
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Payment submission failed");
                let error = PaymentError::new(PaymentErrorKind::Submission, e.to_string());
                self.fail("send_payment_form", generation, "submission_failed", error)
                    .await
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.submit_timeout.as_secs(),
                    "Payment submission timed out"
                );
                let error = PaymentError::new(
                    PaymentErrorKind::Timeout,
                    "The payment could not be confirmed in time",
                );
                self.fail("send_payment_form", generation, "submission_timed_out", error)
                    .await
            }
        }
    }

    pub async fn get_receipt(
        &self,
        chat_id: &str,
        message_id: MessageId,
        receipt_message_id: MessageId,
    ) -> Outcome {
        if message_id == 0 || receipt_message_id == 0 {
            return self.skip("get_receipt", Skipped::PreconditionMissing("message id"));
        }
        let Some(chat) = self.directory.chat(chat_id) else {
            return self.skip("get_receipt", Skipped::UnknownChat(chat_id.to_string()));
        };

        let data = match self.api.get_receipt(&chat, receipt_message_id).await {
            Ok(Some(data)) => data,
            Ok(None) => return self.skip("get_receipt", Skipped::EmptyResult),
            Err(e) => {
                tracing::warn!(error = %e, chat_id, "Failed to fetch receipt");
                return self.skip("get_receipt", Skipped::EmptyResult);
            }
        };

        let receipt = Receipt {
            chat_id: ChatId::from(chat_id),
            message_id,
            data,
            message: self.directory.invoice_message(chat_id, message_id),
        };
        self.commit("receipt_loaded", vec![SessionEvent::ReceiptSet(receipt)]).await
    }

    pub async fn set_payment_step(&self, step: Option<PaymentStep>) -> Outcome {
        let step = step.unwrap_or(PaymentStep::ShippingInfo);
        self.commit("step_set", vec![SessionEvent::StepSet(step)]).await
    }

    /// Drops the current attempt's status and error but keeps the form so the
    /// buyer can start over.
    pub async fn cancel_payment(&self) -> Outcome {
        self.commit(
            "payment_cancelled",
            vec![
                SessionEvent::StatusSet(PaymentStatus::Cancelled),
                SessionEvent::ErrorCleared,
            ],
        )
        .await
    }

    pub async fn clear_payment_error(&self) -> Outcome {
        self.commit("error_cleared", vec![SessionEvent::ErrorCleared]).await
    }

    pub async fn clear_receipt(&self) -> Outcome {
        self.commit("receipt_cleared", vec![SessionEvent::ReceiptCleared]).await
    }

    pub async fn close_invoice(&self) -> Outcome {
        self.commit("invoice_closed", vec![SessionEvent::ModalClosed]).await
    }

    pub async fn clear_payment(&self) -> Outcome {
        self.commit("cleared", vec![SessionEvent::Cleared]).await
    }

    pub async fn open_premium_modal(&self, request: PremiumModalRequest) -> Outcome {
        let result = match self.api.fetch_premium_promo().await {
            Ok(Some(result)) => result,
            Ok(None) => return self.skip("open_premium_modal", Skipped::EmptyResult),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch premium promo");
                return self.skip("open_premium_modal", Skipped::EmptyResult);
            }
        };

        let modal = PremiumModal {
            promo: result.promo,
            users: result.users,
            initial_section: request.initial_section,
            from_user_id: request.from_user_id,
            is_success: request.is_success,
            is_open: true,
            is_closing: false,
        };
        self.commit(
            "premium_modal_opened",
            vec![SessionEvent::PremiumModalOpened(modal)],
        )
        .await
    }

    /// Starts the closing animation, or closes outright once `is_closed` is set.
    pub async fn close_premium_modal(&self, is_closed: bool) -> Outcome {
        if self.store.snapshot().await.premium_modal.is_none() {
            return self.skip(
                "close_premium_modal",
                Skipped::PreconditionMissing("premium modal"),
            );
        }
        if is_closed {
            self.commit("premium_modal_closed", vec![SessionEvent::PremiumModalClosed]).await
        } else {
            self.commit("premium_modal_closing", vec![SessionEvent::PremiumModalClosing]).await
        }
    }
}
