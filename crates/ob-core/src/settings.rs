//! Provisioning settings injected into the orchestrator.

use ob_connectors::{OutboundEmail, ResetLink, RoleId};

/// Placeholder the body template must contain; replaced with the
/// password-setup URL at send time.
pub const RESET_LINK_PLACEHOLDER: &str = "{reset_link}";

/// Values the orchestrator needs beyond the connectors themselves.
/// All of these are configuration, not code: the role every new
/// account receives, and the welcome email envelope.
#[derive(Debug, Clone)]
pub struct ProvisioningSettings {
    /// Role assigned to every newly created account.
    pub role_id: RoleId,
    /// Sender address for the welcome email.
    pub email_from: String,
    /// Subject line for the welcome email.
    pub email_subject: String,
    /// Plain-text body template containing `{reset_link}`.
    pub email_body_template: String,
}

impl ProvisioningSettings {
    /// Checks the settings are usable before any request is served.
    pub fn validate(&self) -> Result<(), String> {
        if self.email_from.trim().is_empty() {
            return Err("email_from must not be empty".to_string());
        }
        if !self.email_body_template.contains(RESET_LINK_PLACEHOLDER) {
            return Err(format!(
                "email body template must contain the {} placeholder",
                RESET_LINK_PLACEHOLDER
            ));
        }
        Ok(())
    }

    /// Renders the welcome email for `to` with the reset link spliced
    /// into the body template.
    pub fn welcome_email(&self, to: &str, reset_link: &ResetLink) -> OutboundEmail {
        OutboundEmail {
            to: to.to_string(),
            from: self.email_from.clone(),
            subject: self.email_subject.clone(),
            body: self
                .email_body_template
                .replace(RESET_LINK_PLACEHOLDER, reset_link.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProvisioningSettings {
        ProvisioningSettings {
            role_id: RoleId(3),
            email_from: "onboarding@example.com".to_string(),
            email_subject: "Welcome to the analytics platform".to_string(),
            email_body_template: "Click this link to get set up: {reset_link}".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_placeholder() {
        let mut s = settings();
        s.email_body_template = "no link here".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_sender() {
        let mut s = settings();
        s.email_from = " ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_welcome_email_rendering() {
        let link = ResetLink::new("https://bi.example.com/password/reset/abc".to_string());
        let email = settings().welcome_email("ada@example.com", &link);

        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.from, "onboarding@example.com");
        assert_eq!(email.subject, "Welcome to the analytics platform");
        assert_eq!(
            email.body,
            "Click this link to get set up: https://bi.example.com/password/reset/abc"
        );
    }
}
