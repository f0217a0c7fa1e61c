#![allow(dead_code)]

use checkout::api::PaymentFormResult;
use checkout::directory::InMemoryDirectory;
use checkout::mock::MockPaymentsApi;
use checkout::Checkout;
use checkout_core::models::{
    CardEntry, Chat, InputInvoice, Invoice, InvoiceMessage, NativeParams, NativeProvider,
    PaymentForm, ReceiptData,
};
use provider::mock::MockTokenizer;
use provider::{ProviderRegistry, Tokenizer};
use std::sync::Arc;
use store::PaymentStateStore;

pub const CHAT_ID: &str = "chat-100";
pub const INVOICE_MESSAGE_ID: i32 = 42;

pub fn chat() -> Chat {
    Chat {
        id: CHAT_ID.to_string(),
        title: "Coffee Bot".to_string(),
        access_hash: Some("hash".to_string()),
    }
}

pub fn invoice_message() -> InvoiceMessage {
    InvoiceMessage {
        title: "Flat white".to_string(),
        text: "Oat milk, no sugar".to_string(),
        photo_url: None,
    }
}

pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_chat(chat())
        .with_message(CHAT_ID, INVOICE_MESSAGE_ID, invoice_message())
}

pub fn slug_invoice() -> InputInvoice {
    InputInvoice::Slug {
        slug: "coffee-123".to_string(),
    }
}

pub fn chat_invoice() -> InputInvoice {
    InputInvoice::Message {
        chat_id: CHAT_ID.to_string(),
        message_id: INVOICE_MESSAGE_ID,
    }
}

pub fn invoice() -> Invoice {
    Invoice {
        title: "Flat white".to_string(),
        text: "Oat milk, no sugar".to_string(),
        currency: "USD".to_string(),
        amount: 450,
        ..Invoice::default()
    }
}

pub fn form(provider: NativeProvider) -> PaymentForm {
    PaymentForm {
        form_id: "form-1".to_string(),
        bot_id: Some("bot-1".to_string()),
        provider_id: Some("provider-1".to_string()),
        native_provider: Some(provider),
        native_params: NativeParams {
            publishable_key: Some("pk_test_123".to_string()),
            public_token: Some("sg_public".to_string()),
            ..NativeParams::default()
        },
        saved_info: None,
        saved_credentials_title: None,
        can_save_credentials: true,
    }
}

pub fn form_result(provider: NativeProvider, invoice: Invoice) -> PaymentFormResult {
    PaymentFormResult {
        form: form(provider),
        invoice,
    }
}

pub fn card() -> CardEntry {
    CardEntry {
        card_number: "4242 4242 4242 4242".to_string(),
        cardholder: Some("Jane Doe".to_string()),
        expiry_month: "04".to_string(),
        expiry_year: "30".to_string(),
        cvv: "123".to_string(),
        country: Some("US".to_string()),
        zip: Some("94107".to_string()),
    }
}

pub fn receipt_data() -> ReceiptData {
    ReceiptData {
        currency: "USD".to_string(),
        total_amount: 450,
        prices: vec![],
        credentials_title: "Visa *4242".to_string(),
        info: None,
        shipping: None,
        tip_amount: None,
    }
}

pub struct Harness {
    pub checkout: Arc<Checkout>,
    pub api: Arc<MockPaymentsApi>,
    pub store: Arc<PaymentStateStore>,
}

pub fn harness_with(
    store: PaymentStateStore,
    stripe: Arc<dyn Tokenizer>,
    smart_glocal: Arc<dyn Tokenizer>,
) -> Harness {
    let api = MockPaymentsApi::new();
    let store = Arc::new(store);
    let checkout = Checkout::new(
        Arc::clone(&store),
        api.clone(),
        Arc::new(directory()),
        ProviderRegistry::new(stripe, smart_glocal),
    );
    Harness {
        checkout: Arc::new(checkout),
        api,
        store,
    }
}

pub fn harness() -> Harness {
    harness_with(
        PaymentStateStore::new(),
        MockTokenizer::new(NativeProvider::Stripe),
        MockTokenizer::new(NativeProvider::SmartGlocal),
    )
}

/// Opens a slug invoice paid through `provider`.
pub async fn open(h: &Harness, provider: NativeProvider, invoice: Invoice) {
    h.api
        .set_payment_form(Some(form_result(provider, invoice)))
        .await;
    assert!(h.checkout.open_invoice(slug_invoice()).await.is_applied());
}
