use checkout_core::models::{
    CardEntry, NativeParams, NativeProvider, PaymentError, PaymentErrorKind,
};
use provider::smartglocal::SmartGlocalClient;
use provider::{TokenizeError, Tokenizer};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card() -> CardEntry {
    CardEntry {
        card_number: "4242 4242 4242 4242".into(),
        cardholder: Some("Jane Doe".into()),
        expiry_month: "04".into(),
        expiry_year: "30".into(),
        cvv: " 123 ".into(),
        country: None,
        zip: None,
    }
}

#[tokio::test]
async fn sends_digits_only_and_reads_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cds/v1/tokenize/card"))
        .and(header("X-PUBLIC-TOKEN", "sg_public"))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({
            "card": {
                "number": "4242424242424242",
                "expiration_month": "04",
                "expiration_year": "30",
                "security_code": "123",
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"token": "sg_tok_1"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SmartGlocalClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let token = client
        .tokenize(&card(), &NativeParams::default(), "sg_public")
        .await
        .unwrap();

    assert_eq!(token.provider, NativeProvider::SmartGlocal);
    assert_eq!(token.token_type, "card");
    assert_eq!(token.id, "sg_tok_1");
}

#[tokio::test]
async fn non_ok_status_is_generic_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cds/v1/tokenize/card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "error": {"code": "card_expired"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SmartGlocalClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = client
        .tokenize(&card(), &NativeParams::default(), "sg_public")
        .await
        .unwrap_err();

    let err: PaymentError = err.into();
    assert_eq!(err.kind, PaymentErrorKind::Declined);
    assert_eq!(err.description, "payment error");
    assert_eq!(err.field, None);
}

async fn refusal_for(response: ResponseTemplate) -> PaymentError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cds/v1/tokenize/card"))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;

    let client = SmartGlocalClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    client
        .tokenize(&card(), &NativeParams::default(), "sg_public")
        .await
        .unwrap_err()
        .into()
}

#[tokio::test]
async fn missing_status_is_generic_refusal() {
    let err = refusal_for(
        ResponseTemplate::new(400).set_body_json(json!({"error": {"code": "invalid_card"}})),
    )
    .await;
    assert_eq!(err.kind, PaymentErrorKind::Declined);
    assert_eq!(err.description, "payment error");
}

#[tokio::test]
async fn unreadable_body_is_generic_refusal() {
    let err =
        refusal_for(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>")).await;
    assert_eq!(err.kind, PaymentErrorKind::Declined);
    assert_eq!(err.description, "payment error");
}

#[tokio::test]
async fn ok_without_data_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = SmartGlocalClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = client
        .tokenize(&card(), &NativeParams::default(), "sg_public")
        .await
        .unwrap_err();
    assert!(matches!(err, TokenizeError::Malformed { .. }));
}
