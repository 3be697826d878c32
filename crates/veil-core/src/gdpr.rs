//! GDPR-aware log masking helpers.
//!
//! Personal data must not reach log output in the clear. Repositories mask
//! emails with [`mask_email`] before putting them in a tracing field;
//! password hashes, salts and token material are never logged at all.

/// Mask an email address for logging.
///
/// The first character of the local part is kept and the rest replaced, the
/// domain stays readable: `alice@example.com` becomes `a***@example.com`.
/// Values that do not look like an email (no `@`) are masked entirely so a
/// mistyped value cannot leak.
#[must_use]
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_local_part_keeping_domain() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("b@veil.dev"), "b***@veil.dev");
    }

    #[test]
    fn masks_multibyte_first_character_intact() {
        assert_eq!(mask_email("ågot@example.com"), "å***@example.com");
    }

    #[test]
    fn degenerate_values_are_masked_entirely() {
        assert_eq!(mask_email("@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email(""), "***");
    }
}
