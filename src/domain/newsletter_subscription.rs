use serde::Deserialize;

use super::{EmailAddress, ValidationError};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct NewsletterForm {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewsletterSubscription {
    pub email: EmailAddress,
}

impl TryFrom<NewsletterForm> for NewsletterSubscription {
    type Error = ValidationError;

    fn try_from(form: NewsletterForm) -> Result<Self, Self::Error> {
        EmailAddress::parse(form.email)
            .map(|email| Self { email })
            .map_err(|e| ValidationError::from_fields([("email", Some(e))]))
    }
}
