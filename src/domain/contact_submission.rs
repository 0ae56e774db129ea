use serde::Deserialize;

use super::{ContactMessage, ContactName, EmailAddress, ValidationError};

/// Raw contact form body. Missing fields deserialize as empty strings so that
/// the validator reports them alongside every other violation.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub message: ContactMessage,
}

impl TryFrom<ContactForm> for ContactSubmission {
    type Error = ValidationError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let name = ContactName::parse(form.name);
        let email = EmailAddress::parse(form.email);
        let message = ContactMessage::parse(form.message);

        match (name, email, message) {
            (Ok(name), Ok(email), Ok(message)) => Ok(Self {
                name,
                email,
                message,
            }),
            (name, email, message) => Err(ValidationError::from_fields([
                ("name", name.err()),
                ("email", email.err()),
                ("message", message.err()),
            ])),
        }
    }
}
