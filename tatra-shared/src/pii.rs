use serde::{Serialize, Serializer};
use std::fmt;

/// A wrapper for traveler contact data (emails, phone numbers) that masks its
/// value in Debug and Display output.
///
/// Serialization passes the real value through, so the wrapper is safe to keep
/// inside API responses while `tracing::info!("{}", email)` stays redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask(self.0.as_ref()))
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask(self.0.as_ref()))
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Redact a contact value for logging.
///
/// Emails keep their first character and domain (`a***@example.com`), anything
/// else keeps only its last two characters (`***89`).
pub fn mask(value: &str) -> String {
    if let Some((local, domain)) = value.split_once('@') {
        let first: String = local.chars().take(1).collect();
        return format!("{first}***@{domain}");
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "********".to_string();
    }
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("***{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_keeping_domain() {
        assert_eq!(Masked("ann@example.com").to_string(), "a***@example.com");
        assert_eq!(format!("{:?}", Masked("ann@example.com")), "a***@example.com");
    }

    #[test]
    fn masks_phone_keeping_tail() {
        assert_eq!(mask("+421 900 123 456"), "***56");
        assert_eq!(mask("123"), "********");
    }

    #[test]
    fn serializes_real_value() {
        let json = serde_json::to_string(&Masked("ann@example.com".to_string())).unwrap();
        assert_eq!(json, "\"ann@example.com\"");
    }
}
