// ABOUTME: SMTP mailer built on lettre's async transport over tokio and rustls
// ABOUTME: Maps relay replies and transport failures onto DeliveryError variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mealprep_core::EmailMessage;
use tracing::{info, instrument, warn};

use super::{DeliveryError, DeliveryMode, DeliveryReceipt, Mailer};
use crate::config::{MailConfig, TlsMode};
use crate::constants::service_names;
use crate::errors::{AppError, AppResult};

/// Reply codes meaning the relay refused our credentials
const AUTH_FAILURE_CODES: [u16; 3] = [530, 534, 535];

/// Sends mail through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailer {
    /// Build the transport from mail configuration
    ///
    /// No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the sender address does not parse
    /// or the relay host cannot be used for TLS.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let address = config.from.parse().map_err(|e: AddressError| {
            AppError::config(format!("invalid SMTP_FROM address {}", config.from)).with_source(e)
        })?;
        let from = Mailbox::new(Some(service_names::BRAND.to_owned()), address);

        let builder = match config.tls {
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host),
            TlsMode::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &config.host,
            )),
        }
        .map_err(|e| {
            AppError::config(format!("cannot configure SMTP relay {}", config.host)).with_source(e)
        })?;

        let mut builder = builder.port(config.port).timeout(Some(config.timeout));
        if let Some((username, password)) = config.credentials() {
            builder = builder.credentials(Credentials::new(username.to_owned(), password.to_owned()));
        }

        info!(
            smtp.host = %config.host,
            smtp.port = config.port,
            smtp.tls = ?config.tls,
            "SMTP mailer configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
            timeout: config.timeout,
        })
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message, DeliveryError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e: AddressError| DeliveryError::InvalidRecipient(e.to_string()))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }

    fn map_smtp_error(&self, error: &SmtpError) -> DeliveryError {
        if error.is_timeout() {
            return DeliveryError::Timeout(self.timeout);
        }

        let code = error
            .status()
            .and_then(|code| code.to_string().parse::<u16>().ok());
        match code {
            Some(code) if AUTH_FAILURE_CODES.contains(&code) => {
                DeliveryError::Authentication(format!("relay replied {code}"))
            }
            Some(code) if error.is_permanent() => DeliveryError::Rejected { code },
            _ => DeliveryError::Transport(error.to_string()),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Smtp
    }

    #[instrument(skip_all, fields(mail.mode = "smtp"))]
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let email = self.build_message(message)?;

        let response = match tokio::time::timeout(self.timeout, self.transport.send(email)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                let error = self.map_smtp_error(&e);
                warn!(error = %e, "SMTP send failed");
                return Err(error);
            }
            Err(_) => return Err(DeliveryError::Timeout(self.timeout)),
        };

        let reply = response.message().collect::<Vec<_>>().join(" ");
        info!(smtp.code = %response.code(), "Message accepted by relay");
        Ok(DeliveryReceipt::now(
            DeliveryMode::Smtp,
            Some(reply).filter(|r| !r.is_empty()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: &str) -> MailConfig {
        MailConfig {
            host: "smtp.example.com".into(),
            port: 465,
            username: Some("sender@example.com".into()),
            password: Some("app-password".into()),
            from: from.into(),
            tls: TlsMode::Tls,
            timeout: Duration::from_secs(5),
            force_dry_run: false,
        }
    }

    #[test]
    fn test_invalid_sender_is_config_error() {
        assert!(SmtpMailer::new(&config("not an address")).is_err());
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_connecting() {
        let mailer = SmtpMailer::new(&config("sender@example.com")).unwrap();
        let message = EmailMessage {
            to: "nobody".into(),
            subject: "MealPrepAI: Soup".into(),
            body: "RECIPE".into(),
        };

        let error = mailer.send(&message).await.unwrap_err();
        assert!(matches!(error, DeliveryError::InvalidRecipient(_)));
        assert_eq!(mailer.mode(), DeliveryMode::Smtp);
    }
}
