//! SendGrid connector.
//!
//! Single operation: submit a rendered plain-text message through the
//! v3 mail send endpoint. The API key comes in via the connector's
//! bearer auth config.

use crate::http::HttpClient;
use crate::traits::{
    AuthConfig, ConnectorConfig, ConnectorError, ConnectorResult, EmailConnector, OutboundEmail,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

/// SendGrid connector configuration.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub connector: ConnectorConfig,
}

/// SendGrid transactional email connector.
pub struct SendGridConnector {
    config: SendGridConfig,
    client: HttpClient,
}

impl SendGridConnector {
    pub fn new(config: SendGridConfig) -> ConnectorResult<Self> {
        match &config.connector.auth {
            AuthConfig::BearerToken { token } if !token.is_empty() => {}
            _ => {
                return Err(ConnectorError::ConfigError(
                    "sendgrid requires a bearer API key".into(),
                ))
            }
        }
        let client = HttpClient::new(config.connector.clone())?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl EmailConnector for SendGridConnector {
    fn name(&self) -> &str {
        &self.config.connector.name
    }

    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send_welcome_email(&self, message: &OutboundEmail) -> ConnectorResult<()> {
        let payload = MailSend {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: &message.to,
                }],
            }],
            from: EmailAddress {
                email: &message.from,
            },
            subject: &message.subject,
            content: vec![MailContent {
                content_type: "text/plain",
                value: &message.body,
            }],
        };

        let request = self.client.post("/v3/mail/send").json(&payload);
        // SendGrid answers 202 Accepted on success
        self.client.execute(request).await?;
        info!("welcome email submitted");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: EmailAddress<'a>,
    subject: &'a str,
    content: Vec<MailContent<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<EmailAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct MailContent<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}
