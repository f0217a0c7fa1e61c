use super::FieldIssue;
use crate::models::{CardEntry, CardField, NativeParams};

fn issue(field: CardField, reason: &'static str) -> FieldIssue {
    FieldIssue { field, reason }
}

/// Digits of `value` once spaces and dashes are dropped, or `None` if anything
/// else is mixed in.
fn digits_ignoring_separators(value: &str) -> Option<String> {
    let mut digits = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' => {}
            _ => return None,
        }
    }
    Some(digits)
}

pub(super) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(super) fn common_card_checks(card: &CardEntry, params: &NativeParams) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    match digits_ignoring_separators(&card.card_number) {
        Some(d) if (12..=19).contains(&d.len()) => {}
        Some(_) => issues.push(issue(CardField::CardNumber, "must have 12 to 19 digits")),
        None => issues.push(issue(CardField::CardNumber, "must contain only digits")),
    }

    let month = card.expiry_month.trim();
    let month_ok = (1..=2).contains(&month.len())
        && month.chars().all(|c| c.is_ascii_digit())
        && matches!(month.parse::<u8>(), Ok(1..=12));
    if !month_ok {
        issues.push(issue(CardField::Expiry, "month must be between 1 and 12"));
    }

    let year = card.expiry_year.trim();
    if !matches!(year.len(), 2 | 4) || !year.chars().all(|c| c.is_ascii_digit()) {
        issues.push(issue(CardField::Expiry, "year must have 2 or 4 digits"));
    }

    match digits_ignoring_separators(&card.cvv) {
        Some(d) if (3..=4).contains(&d.len()) => {}
        _ => issues.push(issue(CardField::Cvv, "must have 3 or 4 digits")),
    }

    if params.need_cardholder_name && non_blank(card.cardholder.as_deref()).is_none() {
        issues.push(issue(CardField::Cardholder, "is required"));
    }

    issues
}

pub(super) fn billing_checks(card: &CardEntry, params: &NativeParams) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if params.need_country && non_blank(card.country.as_deref()).is_none() {
        issues.push(issue(CardField::Country, "is required"));
    }
    if params.need_zip && non_blank(card.zip.as_deref()).is_none() {
        issues.push(issue(CardField::Zip, "is required"));
    }
    issues
}
