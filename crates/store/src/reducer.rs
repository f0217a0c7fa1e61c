use crate::state::{CheckoutState, PaymentSession, PremiumModal};
use checkout_core::models::{
    InputInvoice, Invoice, PaymentError, PaymentForm, PaymentStatus, PaymentStep, ProviderToken,
    Receipt, ShippingOption,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Starts a new checkout: a fresh session that only carries over the
    /// receipt slice, opened modal, status `cancelled`.
    Opened { input_invoice: InputInvoice },
    FormSet(PaymentForm),
    InvoiceSet(Invoice),
    StepSet(PaymentStep),
    RequestInfoIdSet(String),
    ShippingOptionsSet(Vec<ShippingOption>),
    ProviderTokenSet(ProviderToken),
    StatusSet(PaymentStatus),
    ErrorSet(PaymentError),
    ErrorCleared,
    ReceiptSet(Receipt),
    ReceiptCleared,
    ModalClosed,
    Cleared,
    PremiumModalOpened(PremiumModal),
    PremiumModalClosing,
    PremiumModalClosed,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Opened { .. } => "opened",
            SessionEvent::FormSet(_) => "form_set",
            SessionEvent::InvoiceSet(_) => "invoice_set",
            SessionEvent::StepSet(_) => "step_set",
            SessionEvent::RequestInfoIdSet(_) => "request_info_id_set",
            SessionEvent::ShippingOptionsSet(_) => "shipping_options_set",
            SessionEvent::ProviderTokenSet(_) => "provider_token_set",
            SessionEvent::StatusSet(_) => "status_set",
            SessionEvent::ErrorSet(_) => "error_set",
            SessionEvent::ErrorCleared => "error_cleared",
            SessionEvent::ReceiptSet(_) => "receipt_set",
            SessionEvent::ReceiptCleared => "receipt_cleared",
            SessionEvent::ModalClosed => "modal_closed",
            SessionEvent::Cleared => "cleared",
            SessionEvent::PremiumModalOpened(_) => "premium_modal_opened",
            SessionEvent::PremiumModalClosing => "premium_modal_closing",
            SessionEvent::PremiumModalClosed => "premium_modal_closed",
        }
    }
}

/// Applies one event. Each arm touches only the slices the event names.
pub fn reduce(mut state: CheckoutState, event: SessionEvent) -> CheckoutState {
    let payment = &mut state.payment;
    match event {
        SessionEvent::Opened { input_invoice } => {
            let receipt = payment.receipt.take();
            state.payment = PaymentSession {
                input_invoice: Some(input_invoice),
                receipt,
                status: Some(PaymentStatus::Cancelled),
                is_modal_open: true,
                ..PaymentSession::default()
            };
            state.generation += 1;
        }
        SessionEvent::FormSet(form) => {
            payment.native_provider = form.native_provider;
            payment.form = Some(form);
        }
        SessionEvent::InvoiceSet(invoice) => payment.invoice = Some(invoice),
        SessionEvent::StepSet(step) => payment.step = Some(step),
        SessionEvent::RequestInfoIdSet(id) => payment.request_info_id = Some(id),
        SessionEvent::ShippingOptionsSet(options) => payment.shipping_options = Some(options),
        SessionEvent::ProviderTokenSet(token) => payment.provider_token = Some(token),
        SessionEvent::StatusSet(status) => payment.status = Some(status),
        SessionEvent::ErrorSet(error) => payment.error = Some(error),
        SessionEvent::ErrorCleared => payment.error = None,
        SessionEvent::ReceiptSet(receipt) => payment.receipt = Some(receipt),
        SessionEvent::ReceiptCleared => payment.receipt = None,
        SessionEvent::ModalClosed => payment.is_modal_open = false,
        SessionEvent::Cleared => {
            state.payment = PaymentSession::default();
            state.generation += 1;
        }
        SessionEvent::PremiumModalOpened(modal) => state.premium_modal = Some(modal),
        SessionEvent::PremiumModalClosing => {
            if let Some(modal) = state.premium_modal.as_mut() {
                modal.is_closing = true;
            }
        }
        SessionEvent::PremiumModalClosed => {
            if let Some(modal) = state.premium_modal.as_mut() {
                modal.is_open = false;
                modal.is_closing = false;
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::models::{NativeParams, NativeProvider, PaymentErrorKind};

    fn form() -> PaymentForm {
        PaymentForm {
            form_id: "form-1".into(),
            bot_id: None,
            provider_id: None,
            native_provider: Some(NativeProvider::Stripe),
            native_params: NativeParams {
                publishable_key: Some("pk_test".into()),
                ..NativeParams::default()
            },
            saved_info: None,
            saved_credentials_title: None,
            can_save_credentials: true,
        }
    }

    fn opened() -> CheckoutState {
        [
            SessionEvent::Opened {
                input_invoice: InputInvoice::Slug { slug: "s".into() },
            },
            SessionEvent::FormSet(form()),
            SessionEvent::StepSet(PaymentStep::PaymentInfo),
        ]
        .into_iter()
        .fold(CheckoutState::default(), reduce)
    }

    #[test]
    fn opening_starts_a_new_generation() {
        let state = opened();
        assert_eq!(state.generation, 1);
        assert!(state.payment.is_modal_open);
        assert_eq!(state.payment.status, Some(PaymentStatus::Cancelled));
        assert_eq!(state.payment.native_provider, Some(NativeProvider::Stripe));
        assert_eq!(state.payment.public_credential(), Some("pk_test"));
    }

    #[test]
    fn reopening_drops_stale_slices_but_keeps_receipt() {
        let mut state = reduce(opened(), SessionEvent::RequestInfoIdSet("info-1".into()));
        state.payment.receipt = Some(Receipt {
            chat_id: "c".into(),
            message_id: 1,
            data: checkout_core::models::ReceiptData {
                currency: "USD".into(),
                total_amount: 100,
                prices: vec![],
                credentials_title: "Visa *4242".into(),
                info: None,
                shipping: None,
                tip_amount: None,
            },
            message: None,
        });

        let state = reduce(
            state,
            SessionEvent::Opened {
                input_invoice: InputInvoice::Slug { slug: "t".into() },
            },
        );
        assert_eq!(state.generation, 2);
        assert_eq!(state.payment.request_info_id, None);
        assert!(state.payment.form.is_none());
        assert!(state.payment.receipt.is_some());
    }

    #[test]
    fn error_cleared_touches_only_error() {
        let failed = reduce(
            opened(),
            SessionEvent::ErrorSet(PaymentError::new(PaymentErrorKind::Declined, "no")),
        );
        let cleared = reduce(failed.clone(), SessionEvent::ErrorCleared);

        let mut expected = failed;
        expected.payment.error = None;
        assert_eq!(cleared, expected);
    }

    #[test]
    fn cleared_resets_everything() {
        let state = reduce(opened(), SessionEvent::Cleared);
        assert_eq!(state.payment, PaymentSession::default());
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn premium_close_without_modal_is_noop() {
        let state = reduce(CheckoutState::default(), SessionEvent::PremiumModalClosing);
        assert_eq!(state, CheckoutState::default());
    }
}
