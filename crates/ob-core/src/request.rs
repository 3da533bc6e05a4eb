//! Inbound provisioning request model.

use crate::provision::ProvisionError;

/// A validated request to provision one user. Exists only for the
/// duration of a single webhook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProvisioningRequest {
    /// Splits `full_name` into first and last name on the first space.
    /// A name without a space cannot be provisioned; the platform
    /// requires both fields.
    pub fn parse(full_name: &str, email: &str) -> Result<Self, ProvisionError> {
        let full_name = full_name.trim();
        let (first, last) = full_name.split_once(' ').ok_or_else(|| {
            ProvisionError::Validation(format!(
                "full name '{}' must contain first and last name separated by a space",
                full_name
            ))
        })?;

        let last = last.trim();
        if first.is_empty() || last.is_empty() {
            return Err(ProvisionError::Validation(
                "first and last name must both be non-empty".to_string(),
            ));
        }
        if email.trim().is_empty() {
            return Err(ProvisionError::Validation(
                "email must not be empty".to_string(),
            ));
        }

        Ok(Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_first_space() {
        let request = ProvisioningRequest::parse("Ada Lovelace", "ada@example.com").unwrap();
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.last_name, "Lovelace");
        assert_eq!(request.email, "ada@example.com");
    }

    #[test]
    fn test_parse_multi_part_surname() {
        // Everything after the first space belongs to the last name
        let request =
            ProvisioningRequest::parse("Ada Lovelace King", "ada@example.com").unwrap();
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.last_name, "Lovelace King");
    }

    #[test]
    fn test_parse_trims_extra_spaces_between_names() {
        let request = ProvisioningRequest::parse("Ada  Lovelace", "ada@example.com").unwrap();
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.last_name, "Lovelace");
    }

    #[test]
    fn test_parse_rejects_single_name() {
        let result = ProvisioningRequest::parse("Madonna", "m@example.com");
        assert!(matches!(result, Err(ProvisionError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_surrounding_whitespace_only() {
        let result = ProvisioningRequest::parse("  Madonna  ", "m@example.com");
        assert!(matches!(result, Err(ProvisionError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_empty_email() {
        let result = ProvisioningRequest::parse("Ada Lovelace", "   ");
        assert!(matches!(result, Err(ProvisionError::Validation(_))));
    }
}
