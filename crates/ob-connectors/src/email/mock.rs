//! In-memory email connector for tests.

use crate::traits::{ConnectorError, ConnectorResult, EmailConnector, OutboundEmail};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock email provider that records submitted messages and can be
/// configured to fail.
#[derive(Default)]
pub struct MockEmailConnector {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_send: Option<ConnectorError>,
}

impl MockEmailConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_send_failure(mut self, error: ConnectorError) -> Self {
        self.fail_send = Some(error);
        self
    }

    /// Messages submitted so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailConnector for MockEmailConnector {
    fn name(&self) -> &str {
        "mock-email"
    }

    async fn send_welcome_email(&self, message: &OutboundEmail) -> ConnectorResult<()> {
        if let Some(e) = &self.fail_send {
            return Err(e.clone());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
