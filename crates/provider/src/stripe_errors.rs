use checkout_core::models::{CardField, PaymentError, PaymentErrorKind};
use serde::Deserialize;

/// The `error` object of a Stripe API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub message: Option<String>,
    pub param: Option<String>,
}

fn field_for_code(code: &str) -> Option<(CardField, &'static str)> {
    let mapped = match code {
        "invalid_number" | "incorrect_number" | "missing_payment_information" => {
            (CardField::CardNumber, "Incorrect card number")
        }
        "invalid_expiry_month" | "invalid_expiry_year" => {
            (CardField::Expiry, "Incorrect expiry date")
        }
        "expired_card" => (CardField::Expiry, "The card has expired"),
        "invalid_cvc" | "incorrect_cvc" => (CardField::Cvv, "Incorrect CVV"),
        "incorrect_zip" => (CardField::Zip, "Incorrect zip code"),
        _ => return None,
    };
    Some(mapped)
}

fn field_for_param(param: &str) -> Option<CardField> {
    match param {
        "number" | "card[number]" => Some(CardField::CardNumber),
        "exp_month" | "exp_year" | "card[exp_month]" | "card[exp_year]" => Some(CardField::Expiry),
        "cvc" | "card[cvc]" => Some(CardField::Cvv),
        "address_zip" | "card[address_zip]" => Some(CardField::Zip),
        "address_country" | "card[address_country]" => Some(CardField::Country),
        _ => None,
    }
}

/// Maps a Stripe error onto the uniform payment error, pointing at the card
/// field the buyer has to fix when Stripe tells us which one it is.
pub fn normalize(error: &StripeApiError) -> PaymentError {
    let description = error
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "payment error".to_string());
    let normalized = PaymentError::new(PaymentErrorKind::Declined, description);

    if let Some((field, field_error)) = error.code.as_deref().and_then(field_for_code) {
        return normalized.with_field(field, field_error);
    }
    match error.param.as_deref().and_then(field_for_param) {
        Some(field) => {
            let field_error = normalized.description.clone();
            normalized.with_field(field, field_error)
        }
        None => normalized,
    }
}
