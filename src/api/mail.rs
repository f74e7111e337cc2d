//! Outbound email over a transactional HTTP API.
//!
//! When no mail endpoint is configured the service keeps working: callers
//! get [`MailError::NotConfigured`] back and surface the link they would
//! have mailed through another channel.

use crate::APP_USER_AGENT;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("no mail endpoint configured")]
    NotConfigured,

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("mail endpoint returned status {0}")]
    Status(u16),
}

#[derive(Debug, Serialize, PartialEq)]
struct Party {
    email: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct OutboundMessage {
    sender: Party,
    to: Vec<Party>,
    subject: String,
    text_content: String,
}

/// Transactional mail relay. [`Mailer::Disabled`] logs the message and
/// reports the delivery as failed so callers can degrade gracefully.
pub enum Mailer {
    Disabled,
    Http(MailClient),
}

impl Mailer {
    /// Sends a plain-text message to each recipient.
    pub async fn send(
        &self,
        subject: &str,
        recipients: &[String],
        body: &str,
    ) -> Result<(), MailError> {
        match self {
            Self::Disabled => {
                info!(subject, ?recipients, "Mail delivery disabled, dropping message");
                Err(MailError::NotConfigured)
            }
            Self::Http(client) => client.send(subject, recipients, body).await,
        }
    }
}

pub struct MailClient {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
    sender: String,
}

impl MailClient {
    pub fn new(endpoint: Url, api_key: SecretString, sender: String) -> Result<Self, MailError> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            sender,
        })
    }

    async fn send(
        &self,
        subject: &str,
        recipients: &[String],
        body: &str,
    ) -> Result<(), MailError> {
        let message = OutboundMessage {
            sender: Party {
                email: self.sender.clone(),
            },
            to: recipients
                .iter()
                .map(|email| Party {
                    email: email.clone(),
                })
                .collect(),
            subject: subject.to_string(),
            text_content: body.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("api-key", self.api_key.expose_secret())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Status(status.as_u16()));
        }

        debug!(subject, ?recipients, "Mail accepted by endpoint");

        Ok(())
    }
}
