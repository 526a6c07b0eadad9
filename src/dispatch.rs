//! Outbound mail dispatch.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::envelope::Envelope;
use crate::error::{ConfigError, DispatchError};

/// Transactional send API: one message per call.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Send one forwarded message. Returns a message identifier on success.
    async fn dispatch(&self, envelope: &Envelope) -> Result<String, DispatchError>;
}

/// SMTP relay configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("RELAY_SMTP_HOST")
            .map_err(|_| ConfigError::MissingEnvVar("RELAY_SMTP_HOST".to_string()))?;

        let port: u16 = std::env::var("RELAY_SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let username = std::env::var("RELAY_SMTP_USERNAME").unwrap_or_default();
        let password = std::env::var("RELAY_SMTP_PASSWORD").unwrap_or_default();

        Ok(Self {
            host,
            port,
            username,
            password,
        })
    }
}

/// Dispatcher backed by an SMTP relay.
pub struct SmtpDispatcher {
    config: SmtpConfig,
}

impl SmtpDispatcher {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn send_message(&self, envelope: &Envelope) -> Result<String, DispatchError> {
        let message = Message::builder()
            .from(envelope.from.parse().map_err(|e| {
                DispatchError::InvalidAddress {
                    field: "from".to_string(),
                    reason: format!("{e}"),
                }
            })?)
            .to(envelope.to.parse().map_err(|e| {
                DispatchError::InvalidAddress {
                    field: "to".to_string(),
                    reason: format!("{e}"),
                }
            })?)
            .subject(envelope.subject.clone())
            .body(envelope.body.clone())
            .map_err(|e| DispatchError::Build(e.to_string()))?;

        let transport = SmtpTransport::relay(&self.config.host)
            .map_err(|e| DispatchError::Send(format!("SMTP relay error: {e}")))?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        let response = transport
            .send(&message)
            .map_err(|e| DispatchError::Send(e.to_string()))?;

        Ok(response.message().collect::<Vec<&str>>().join(" "))
    }
}

#[async_trait]
impl MailDispatcher for SmtpDispatcher {
    async fn dispatch(&self, envelope: &Envelope) -> Result<String, DispatchError> {
        let message_id = self.send_message(envelope)?;
        tracing::info!(to = %envelope.to, "Forwarded message accepted by relay");
        Ok(message_id)
    }
}
