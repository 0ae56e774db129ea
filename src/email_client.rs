use std::fmt;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::EmailAddress;

/// An address with an optional display name. Always holds a validated
/// address, so a message can never go out with an empty sender or recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub email: EmailAddress,
    pub name: Option<String>,
}

impl Mailbox {
    pub fn new(email: EmailAddress, name: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self { email, name }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => {
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{escaped}\" <{}>", self.email)
            }
            None => write!(f, "{}", self.email),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub reply_to: Option<Mailbox>,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: Vec<String>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

impl<'a> From<&'a OutboundEmail> for SendEmailRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            from: email.from.to_string(),
            to: vec![email.to.to_string()],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_ref().map(Mailbox::to_string),
        }
    }
}

/// Thin client for the provider's send endpoint. One call, one request.
#[derive(Clone, Debug)]
pub struct EmailClient {
    http_client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl EmailClient {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the email HTTP client.")?;
        let base_url = Url::parse(base_url).context("Failed parsing base email api url.")?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    pub async fn send_email(&self, email: &OutboundEmail) -> Result<(), anyhow::Error> {
        let url = self
            .base_url
            .join("emails")
            .context("Failed joining route to email api url.")?;

        let body = SendEmailRequest::from(email);

        self.http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("Failed to reach the email provider.")?
            .error_for_status()
            .context("The email provider rejected the message.")?;

        Ok(())
    }
}
