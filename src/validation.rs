//! Normalization and validation rules for user rows.
//!
//! Names are title-cased on their first character only: `"mary-jane"` becomes
//! `"Mary-jane"`, not `"Mary-Jane"`. Emails are trimmed and lower-cased.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::NameField;

/// Column width of `users.name` and `users.surname`.
pub const MAX_NAME_LEN: usize = 100;
/// Column width of `users.email`.
pub const MAX_EMAIL_LEN: usize = 255;

const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LABEL_LEN: usize = 63;

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Letters (any script), whitespace, apostrophes and hyphens.
fn get_name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"^[\p{L}\s'-]+$").expect("Invalid name regex"))
}

/// `local@domain` where the local part is dot-separated RFC 5322 atext and the
/// domain is two or more labels ending in an alphabetic TLD.
fn get_email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<local>[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*)@(?P<domain>(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,})$",
        )
        .expect("Invalid email regex")
    })
}

/// Trim, lower-case, then upper-case the first character.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut chars = lowered.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    // Letters like 'ß' upper-case to several chars that would not survive a
    // second pass; those stay lower-case.
    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => std::iter::once(single).chain(chars).collect(),
        _ => lowered,
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_NAME_LEN && get_name_regex().is_match(name)
}

/// Expects an already normalized (lower-cased) address.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }

    let Some(captures) = get_email_regex().captures(email) else {
        return false;
    };

    let local_ok = captures
        .name("local")
        .map(|local| local.as_str().len() <= MAX_LOCAL_PART_LEN)
        .unwrap_or(false);
    let domain_ok = captures
        .name("domain")
        .map(|domain| {
            domain
                .as_str()
                .split('.')
                .all(|label| label.len() <= MAX_DOMAIN_LABEL_LEN)
        })
        .unwrap_or(false);

    local_ok && domain_ok
}

/// Returns which name column(s) failed, if any.
pub fn check_names(name: &str, surname: &str) -> Option<NameField> {
    match (is_valid_name(name), is_valid_name(surname)) {
        (true, true) => None,
        (false, true) => Some(NameField::Name),
        (true, false) => Some(NameField::Surname),
        (false, false) => Some(NameField::Both),
    }
}
