mod common;

use checkout::directory::InMemoryDirectory;
use checkout::mock::MockPaymentsApi;
use checkout::{Checkout, Outcome};
use checkout_core::models::{
    CardField, NativeProvider, PaymentErrorKind, PaymentStatus, PaymentStep, ProviderToken,
};
use common::*;
use config::CheckoutConfig;
use provider::smartglocal::SmartGlocalClient;
use provider::stripe::StripeClient;
use provider::ProviderRegistry;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use store::PaymentStateStore;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn stripe_checkout(server: &MockServer) -> (Checkout, Arc<MockPaymentsApi>) {
    let mut cfg = CheckoutConfig::default();
    cfg.providers.stripe_api_base = server.uri();
    let api = MockPaymentsApi::new();
    let checkout = Checkout::from_config(&cfg, api.clone(), Arc::new(directory())).unwrap();
    api.set_payment_form(Some(form_result(NativeProvider::Stripe, invoice())))
        .await;
    assert!(checkout.open_invoice(slug_invoice()).await.is_applied());
    (checkout, api)
}

#[tokio::test]
async fn stripe_token_is_stored_and_submitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tokens"))
        .and(header("Authorization", "Bearer pk_test_123"))
        .and(query_param("card[number]", "4242 4242 4242 4242"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "card",
            "id": "tok_123",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (checkout, api) = stripe_checkout(&server).await;

    let outcome = checkout.send_credentials_info(card()).await;

    assert_eq!(outcome, Outcome::Applied);
    let payment = checkout.store().snapshot().await.payment;
    assert_eq!(payment.step, Some(PaymentStep::Checkout));
    assert_eq!(
        payment.provider_token,
        Some(ProviderToken {
            provider: NativeProvider::Stripe,
            token_type: "card".to_string(),
            id: "tok_123".to_string(),
        })
    );

    checkout.send_payment_form(None, false).await;
    let submissions = api.submissions().await;
    assert_eq!(
        submissions[0].credentials.data,
        json!({"type": "card", "id": "tok_123"})
    );
}

#[tokio::test]
async fn stripe_decline_fails_checkout_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tokens"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "decline_code": "insufficient_funds",
                "message": "Your card has insufficient funds."
            }
        })))
        .mount(&server)
        .await;
    let (checkout, api) = stripe_checkout(&server).await;

    let outcome = checkout.send_credentials_info(card()).await;

    let Outcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(error.kind, PaymentErrorKind::Declined);
    let payment = checkout.store().snapshot().await.payment;
    assert_eq!(payment.status, Some(PaymentStatus::Failed));
    assert_eq!(payment.step, Some(PaymentStep::PaymentInfo));
    assert!(payment.provider_token.is_none());
    assert!(api.submissions().await.is_empty());
}

#[tokio::test]
async fn stripe_field_error_points_at_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tokens"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "type": "card_error",
                "code": "incorrect_cvc",
                "param": "cvc",
                "message": "Your card's security code is incorrect."
            }
        })))
        .mount(&server)
        .await;
    let (checkout, _api) = stripe_checkout(&server).await;

    checkout.send_credentials_info(card()).await;

    let error = checkout.store().snapshot().await.payment.error.unwrap();
    assert_eq!(error.field, Some(CardField::Cvv));
}

#[tokio::test]
async fn smart_glocal_receives_digits_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cds/v1/tokenize/card"))
        .and(header("X-PUBLIC-TOKEN", "sg_public"))
        .and(body_json(json!({
            "card": {
                "number": "4242424242424242",
                "expiration_month": "04",
                "expiration_year": "30",
                "security_code": "123"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"token": "sg-token-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let timeout = Duration::from_secs(5);
    let providers = ProviderRegistry::new(
        StripeClient::new(server.uri(), timeout).unwrap(),
        SmartGlocalClient::new(server.uri(), timeout).unwrap(),
    );
    let api = MockPaymentsApi::new();
    let checkout = Checkout::new(
        Arc::new(PaymentStateStore::new()),
        api.clone(),
        Arc::new(InMemoryDirectory::new()),
        providers,
    );
    api.set_payment_form(Some(form_result(NativeProvider::SmartGlocal, invoice())))
        .await;
    checkout.open_invoice(slug_invoice()).await;

    let outcome = checkout.send_credentials_info(card()).await;

    assert_eq!(outcome, Outcome::Applied);
    let token = checkout
        .store()
        .snapshot()
        .await
        .payment
        .provider_token
        .unwrap();
    assert_eq!(token.credentials_data(), json!({"type": "card", "token": "sg-token-1"}));
}
