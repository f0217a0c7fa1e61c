use checkout_core::models::{
    InputInvoice, Invoice, NativeProvider, PaymentError, PaymentForm, PaymentStatus, PaymentStep,
    PremiumPromo, ProviderToken, Receipt, ShippingOption, User, UserId,
};
use serde::Serialize;

/// The one in-progress checkout. Every field is a slice that events update
/// independently; `Default` is the empty session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentSession {
    pub input_invoice: Option<InputInvoice>,
    pub form: Option<PaymentForm>,
    pub invoice: Option<Invoice>,
    pub step: Option<PaymentStep>,
    pub request_info_id: Option<String>,
    pub shipping_options: Option<Vec<ShippingOption>>,
    pub native_provider: Option<NativeProvider>,
    pub provider_token: Option<ProviderToken>,
    pub receipt: Option<Receipt>,
    pub status: Option<PaymentStatus>,
    pub error: Option<PaymentError>,
    pub is_modal_open: bool,
}

impl PaymentSession {
    pub fn form_id(&self) -> Option<&str> {
        self.form.as_ref().map(|f| f.form_id.as_str())
    }

    pub fn public_credential(&self) -> Option<&str> {
        self.form.as_ref().and_then(PaymentForm::public_credential)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PremiumModal {
    pub promo: PremiumPromo,
    pub users: Vec<User>,
    pub initial_section: Option<String>,
    pub from_user_id: Option<UserId>,
    pub is_success: bool,
    pub is_open: bool,
    pub is_closing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutState {
    /// Bumped whenever a checkout is opened or the session is cleared, so a
    /// response that outlived its session can be recognized and dropped.
    pub generation: u64,
    pub payment: PaymentSession,
    pub premium_modal: Option<PremiumModal>,
}
