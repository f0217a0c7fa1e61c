use serde::{Deserialize, Serialize};
use std::fmt;

pub type ChatId = String;
pub type MessageId = i32;
pub type UserId = String;

/// Reference to the thing being paid for.
///
/// The slug shape wins whenever a `slug` field is present, so deserializing a
/// payload never yields an ambiguous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputInvoice {
    Slug {
        slug: String,
    },
    Message {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub access_hash: Option<String>,
}

/// Invoice reference in the form the backend expects: a slug, or a chat that
/// has already been resolved locally plus the invoice message id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestInputInvoice {
    Slug { slug: String },
    Message { chat: Chat, message_id: MessageId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPrice {
    pub label: String,
    pub amount: i64,
}

/// Server-declared purchase metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub title: String,
    pub text: String,
    pub currency: String,
    pub amount: i64,
    #[serde(default)]
    pub prices: Vec<LabeledPrice>,
    #[serde(default)]
    pub is_test: bool,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_flexible: bool,
    #[serde(default)]
    pub shipping_address_requested: bool,
    #[serde(default)]
    pub name_requested: bool,
    #[serde(default)]
    pub phone_requested: bool,
    #[serde(default)]
    pub email_requested: bool,
    #[serde(default)]
    pub phone_to_provider: bool,
    #[serde(default)]
    pub email_to_provider: bool,
}

impl Invoice {
    /// True when the buyer has to fill in address or contact details before paying.
    pub fn requires_buyer_info(&self) -> bool {
        self.shipping_address_requested
            || self.name_requested
            || self.phone_requested
            || self.email_requested
    }

    pub fn initial_step(&self) -> PaymentStep {
        if self.requires_buyer_info() {
            PaymentStep::ShippingInfo
        } else {
            PaymentStep::PaymentInfo
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeProvider {
    Stripe,
    #[serde(rename = "smartglocal")]
    SmartGlocal,
}

impl NativeProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeProvider::Stripe => "stripe",
            NativeProvider::SmartGlocal => "smartglocal",
        }
    }
}

impl fmt::Display for NativeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public parameters of the native provider, as issued with the payment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeParams {
    pub publishable_key: Option<String>,
    pub public_token: Option<String>,
    #[serde(default)]
    pub need_country: bool,
    #[serde(default)]
    pub need_zip: bool,
    #[serde(default)]
    pub need_cardholder_name: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub form_id: String,
    pub bot_id: Option<UserId>,
    pub provider_id: Option<UserId>,
    pub native_provider: Option<NativeProvider>,
    #[serde(default)]
    pub native_params: NativeParams,
    pub saved_info: Option<RequestInfo>,
    pub saved_credentials_title: Option<String>,
    #[serde(default)]
    pub can_save_credentials: bool,
}

impl PaymentForm {
    /// The credential the declared native provider authenticates with: the
    /// publishable key for Stripe, the public token for SmartGlocal.
    pub fn public_credential(&self) -> Option<&str> {
        let params = &self.native_params;
        match self.native_provider? {
            NativeProvider::Stripe => params.publishable_key.as_deref(),
            NativeProvider::SmartGlocal => params.public_token.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street_line1: String,
    pub street_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country_iso2: String,
    pub post_code: String,
}

/// Buyer-submitted contact and address details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub prices: Vec<LabeledPrice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStep {
    ShippingInfo,
    Shipping,
    PaymentInfo,
    Checkout,
}

impl PaymentStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStep::ShippingInfo => "shipping_info",
            PaymentStep::Shipping => "shipping",
            PaymentStep::PaymentInfo => "payment_info",
            PaymentStep::Checkout => "checkout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Cancelled,
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Raw card fields typed in by the buyer. Never stored in session state.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardEntry {
    pub card_number: String,
    pub cardholder: Option<String>,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub country: Option<String>,
    pub zip: Option<String>,
}

// Card data must never end up in logs.
impl fmt::Debug for CardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardEntry")
            .field("card_number", &"<redacted>")
            .field("cardholder", &self.cardholder)
            .field("expiry_month", &"<redacted>")
            .field("expiry_year", &"<redacted>")
            .field("cvv", &"<redacted>")
            .field("country", &self.country)
            .field("zip", &self.zip)
            .finish()
    }
}

/// Opaque card descriptor issued by a provider after tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderToken {
    pub provider: NativeProvider,
    #[serde(rename = "type")]
    pub token_type: String,
    pub id: String,
}

impl ProviderToken {
    /// Credentials payload the backend expects for this provider.
    pub fn credentials_data(&self) -> serde_json::Value {
        match self.provider {
            NativeProvider::Stripe => serde_json::json!({
                "type": self.token_type,
                "id": self.id,
            }),
            NativeProvider::SmartGlocal => serde_json::json!({
                "type": self.token_type,
                "token": self.id,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    CardNumber,
    Cardholder,
    Expiry,
    Cvv,
    Country,
    Zip,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardField::CardNumber => "card number",
            CardField::Cardholder => "cardholder",
            CardField::Expiry => "expiry date",
            CardField::Cvv => "cvv",
            CardField::Country => "country",
            CardField::Zip => "zip",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorKind {
    InvalidCard,
    Declined,
    Network,
    Timeout,
    Submission,
}

/// Uniform error surfaced to the UI through the session's `error` slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{description}")]
pub struct PaymentError {
    pub kind: PaymentErrorKind,
    pub description: String,
    pub field: Option<CardField>,
    pub field_error: Option<String>,
}

impl PaymentError {
    pub fn new(kind: PaymentErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            field: None,
            field_error: None,
        }
    }

    pub fn with_field(mut self, field: CardField, field_error: impl Into<String>) -> Self {
        self.field = Some(field);
        self.field_error = Some(field_error.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptData {
    pub currency: String,
    pub total_amount: i64,
    #[serde(default)]
    pub prices: Vec<LabeledPrice>,
    pub credentials_title: String,
    pub info: Option<RequestInfo>,
    pub shipping: Option<ShippingOption>,
    pub tip_amount: Option<i64>,
}

/// What the UI shows about the invoice message a receipt belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceMessage {
    pub title: String,
    pub text: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub data: ReceiptData,
    pub message: Option<InvoiceMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumPromo {
    pub status_text: String,
    #[serde(default)]
    pub video_sections: Vec<String>,
    pub currency: Option<String>,
    pub monthly_amount: Option<i64>,
}
