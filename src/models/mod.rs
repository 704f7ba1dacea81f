pub mod admin;
pub mod career;
pub mod contact;
pub mod internship;

/// Trims and collapses runs of inner whitespace. Used on single-line
/// free-text fields before validation so length bounds see the real content.
pub(crate) fn squish(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Loose phone check: digits with optional leading `+` and common
/// separators, 7-20 significant characters.
pub(crate) fn validate_phone(value: &str) -> Result<(), validator::ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if allowed && (7..=20).contains(&digits) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("must be a valid phone number".into());
        Err(err)
    }
}

pub(crate) fn squish_opt(value: &mut Option<String>) {
    if let Some(v) = value {
        let squished = squish(v);
        if squished.is_empty() {
            *value = None;
        } else {
            *value = Some(squished);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squish_collapses_whitespace() {
        assert_eq!(squish("  Jane   Doe \n"), "Jane Doe");
        assert_eq!(squish(""), "");
    }

    #[test]
    fn empty_optionals_become_none() {
        let mut value = Some("   ".to_string());
        squish_opt(&mut value);
        assert_eq!(value, None);

        let mut value = Some(" Pune  ".to_string());
        squish_opt(&mut value);
        assert_eq!(value, Some("Pune".to_string()));
    }

    #[test]
    fn emails_are_lowercased() {
        assert_eq!(normalize_email(" Jane@X.COM "), "jane@x.com");
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("(020) 1234-5678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("not a phone").is_err());
    }
}
