use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::cors::{CorsPolicy, UnmatchedOrigin};
use crate::domain::EmailAddress;
use crate::email_client::{EmailClient, Mailbox};
use crate::email_gateway::EmailGateway;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub cors: CorsSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
    pub notification_email: String,
    pub api_key: Option<SecretString>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl EmailClientSettings {
    /// `None` when no API key is configured; sending is disabled then.
    pub fn client(&self) -> Result<Option<EmailClient>, anyhow::Error> {
        let Some(api_key) = self
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
        else {
            return Ok(None);
        };

        EmailClient::new(&self.base_url, api_key.clone(), self.timeout()).map(Some)
    }

    pub fn gateway(&self) -> Result<EmailGateway, anyhow::Error> {
        EmailGateway::new(self.client()?, self.sender()?, self.notification_recipient()?)
    }

    pub fn sender(&self) -> Result<Mailbox, anyhow::Error> {
        let email = EmailAddress::parse(self.sender_email.clone()).map_err(anyhow::Error::msg)?;
        Ok(Mailbox::new(email, self.sender_name.clone()))
    }

    pub fn notification_recipient(&self) -> Result<Mailbox, anyhow::Error> {
        let email =
            EmailAddress::parse(self.notification_email.clone()).map_err(anyhow::Error::msg)?;
        Ok(Mailbox::new(email, None))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Directory holding the built single-page app, if any.
    pub static_dir: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allowed_suffixes: Vec<String>,
    #[serde(default)]
    pub unmatched_origin: UnmatchedOrigin,
}

impl CorsSettings {
    pub fn policy(&self) -> CorsPolicy {
        CorsPolicy::new(
            self.allowed_origins.clone(),
            self.allowed_suffixes.clone(),
            self.unmatched_origin,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    pub fn current() -> Result<Self, String> {
        std::env::var("APP_ENV")
            .unwrap_or_else(|_| "local".into())
            .try_into()
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" | "development" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, anyhow::Error> {
    let base_path = std::env::current_dir()?;
    let conf_dir = base_path.join("configuration");
    let env = Environment::current().map_err(anyhow::Error::msg)?;

    let settings = config::Config::builder()
        .add_source(config::File::from(conf_dir.join("base")).required(true))
        .add_source(config::File::from(conf_dir.join(env.as_str())).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .with_list_parse_key("cors.allowed_suffixes"),
        )
        .set_override_option("app.port", std::env::var("PORT").ok())?
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
