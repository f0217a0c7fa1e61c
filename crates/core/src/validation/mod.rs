mod rules;

use crate::models::{CardEntry, CardField, NativeParams, PaymentError, PaymentErrorKind};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct FieldIssue {
    pub field: CardField,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card details ({} issue(s))", .issues.len())]
pub struct CardValidationError {
    pub issues: Vec<FieldIssue>,
}

impl From<CardValidationError> for PaymentError {
    fn from(err: CardValidationError) -> Self {
        let description = err
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        let error = PaymentError::new(PaymentErrorKind::InvalidCard, description);
        match err.issues.first() {
            Some(issue) => error.with_field(issue.field, issue.reason),
            None => error,
        }
    }
}

/// Card data accepted for the Stripe token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct StripeCard {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// Card data accepted for the SmartGlocal tokenize endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SmartGlocalCard {
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub security_code: String,
}

impl fmt::Debug for StripeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeCard").finish_non_exhaustive()
    }
}

impl fmt::Debug for SmartGlocalCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartGlocalCard").finish_non_exhaustive()
    }
}

pub fn validate_for_stripe(
    card: &CardEntry,
    params: &NativeParams,
) -> Result<StripeCard, CardValidationError> {
    let mut issues = rules::common_card_checks(card, params);
    issues.extend(rules::billing_checks(card, params));
    if !issues.is_empty() {
        return Err(CardValidationError { issues });
    }

    Ok(StripeCard {
        number: card.card_number.trim().to_string(),
        exp_month: card.expiry_month.trim().to_string(),
        exp_year: card.expiry_year.trim().to_string(),
        cvc: card.cvv.trim().to_string(),
        zip: rules::non_blank(card.zip.as_deref()),
        country: rules::non_blank(card.country.as_deref()),
    })
}

pub fn validate_for_smart_glocal(
    card: &CardEntry,
    params: &NativeParams,
) -> Result<SmartGlocalCard, CardValidationError> {
    let issues = rules::common_card_checks(card, params);
    if !issues.is_empty() {
        return Err(CardValidationError { issues });
    }

    Ok(SmartGlocalCard {
        number: card.card_number.trim().to_string(),
        expiration_month: card.expiry_month.trim().to_string(),
        expiration_year: card.expiry_year.trim().to_string(),
        security_code: card.cvv.trim().to_string(),
    })
}
