//! Input validation for the auth and reflection screens.
//!
//! Pure string checks; each failure carries the inline text the screen shows.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

/// Length of a one-time passcode.
pub const OTP_CODE_LENGTH: usize = 6;

/// How the user wants to receive their one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    Email(String),
    /// Normalized to `+` (if given) followed by digits only.
    Phone(String),
}

impl Contact {
    /// Classify and normalize a raw contact string.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::InvalidContact);
        }
        if raw.contains('@') {
            return validate_email(raw).map(Self::Email);
        }
        if raw.chars().any(|c| c.is_ascii_digit()) {
            return validate_phone(raw).map(Self::Phone);
        }
        Err(ValidationError::InvalidContact)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(s) | Self::Phone(s) => s,
        }
    }

    /// Delivery channel name as the backend expects it.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Phone(_) => "sms",
        }
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate an email address, returning it trimmed and lowercased.
pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if EMAIL.is_match(email) {
        Ok(email.to_lowercase())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validate a phone number. Spaces, dashes, dots and parentheses are
/// ignored; a single leading `+` is kept.
pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    let (plus, rest) = match raw.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", raw),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(ValidationError::InvalidPhone),
        }
    }

    if (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
        Ok(format!("{plus}{digits}"))
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

/// Validate a one-time code: exactly six ASCII digits after trimming.
pub fn validate_otp_code(raw: &str) -> Result<String, ValidationError> {
    let code = raw.trim();
    if code.len() == OTP_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code.to_string())
    } else {
        Err(ValidationError::InvalidCode)
    }
}

/// Reject blank input for a required field.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert_eq!(validate_email(" Sam@Example.com ").unwrap(), "sam@example.com");
        assert!(validate_email("a.b+c@mail.co.uk").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "sam", "sam@", "@example.com", "sam@example", "s am@example.com"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn phone_is_normalized() {
        assert_eq!(validate_phone("+1 (555) 123-4567").unwrap(), "+15551234567");
        assert_eq!(validate_phone("555.123.4567").unwrap(), "5551234567");
    }

    #[test]
    fn phone_length_bounds() {
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("1234567890").is_ok());
        assert!(validate_phone("123456789012345").is_ok());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
    }

    #[test]
    fn contact_picks_channel_by_shape() {
        let email = Contact::parse("sam@example.com").unwrap();
        assert_eq!(email.channel(), "email");
        let phone = Contact::parse("+44 20 7946 0958").unwrap();
        assert_eq!(phone.channel(), "sms");
        assert_eq!(phone.as_str(), "+442079460958");
        assert_eq!(Contact::parse("hello"), Err(ValidationError::InvalidContact));
        assert_eq!(Contact::parse("   "), Err(ValidationError::InvalidContact));
    }

    #[test]
    fn otp_code_must_be_six_digits() {
        assert_eq!(validate_otp_code(" 123456 ").unwrap(), "123456");
        assert!(validate_otp_code("12345").is_err());
        assert!(validate_otp_code("1234567").is_err());
        assert!(validate_otp_code("12a456").is_err());
    }

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("Name", "  Ada ").unwrap(), "Ada");
        let err = require("Name", " \t").unwrap_err();
        assert_eq!(err.to_string(), "Name is required.");
    }
}
