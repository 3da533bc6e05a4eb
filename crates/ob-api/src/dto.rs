//! Request payloads for the API.

use serde::Deserialize;
use validator::Validate;

/// Payload posted to `/usr_gen` by the upstream form handler.
///
/// `name` carries the full display name; it is split into first and
/// last name before the account is created.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProvisionUserPayload {
    /// Full name, e.g. "Ada Lovelace".
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Email address for the new account.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let payload: ProvisionUserPayload =
            serde_json::from_str(r#"{"name": "Ada Lovelace", "email": "ada@example.com"}"#)
                .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.name, "Ada Lovelace");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let payload: ProvisionUserPayload =
            serde_json::from_str(r#"{"name": "Ada Lovelace", "email": "not-an-email"}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let result = serde_json::from_str::<ProvisionUserPayload>(r#"{"name": "Ada"}"#);
        assert!(result.is_err());
    }
}
