//! Request bodies for the provider tokenization endpoints.
//!
//! Everything here is a pure function of validated card data; the HTTP
//! clients in the provider crate only attach what these return.

use crate::validation::{SmartGlocalCard, StripeCard};
use serde::Serialize;

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Form fields for `POST /v1/tokens`, in the order Stripe documents them.
/// Absent billing fields are left out rather than sent empty.
pub fn stripe_token_params(card: &StripeCard) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("card[number]", card.number.clone()),
        ("card[exp_month]", card.exp_month.clone()),
        ("card[exp_year]", card.exp_year.clone()),
        ("card[cvc]", card.cvc.clone()),
    ];
    if let Some(zip) = &card.zip {
        params.push(("card[address_zip]", zip.clone()));
    }
    if let Some(country) = &card.country {
        params.push(("card[address_country]", country.clone()));
    }
    params
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartGlocalTokenizeRequest {
    pub card: SmartGlocalCardBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartGlocalCardBody {
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub security_code: String,
}

pub fn smart_glocal_tokenize_body(card: &SmartGlocalCard) -> SmartGlocalTokenizeRequest {
    SmartGlocalTokenizeRequest {
        card: SmartGlocalCardBody {
            number: digits_only(&card.number),
            expiration_month: card.expiration_month.clone(),
            expiration_year: card.expiration_year.clone(),
            security_code: digits_only(&card.security_code),
        },
    }
}
