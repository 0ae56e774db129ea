use anyhow::Context;
use tera::Tera;

use crate::domain::{ContactSubmission, EmailAddress};
use crate::email_client::{EmailClient, Mailbox, OutboundEmail};

const CONTACT_HTML: &str = "contact_notification.html";
const CONTACT_TEXT: &str = "contact_notification.txt";
const WELCOME_HTML: &str = "newsletter_welcome.html";
const WELCOME_TEXT: &str = "newsletter_welcome.txt";

/// Builds the site's two outbound messages and hands them to the provider.
///
/// Without a client (no API key configured) every send reports failure
/// without touching the network.
pub struct EmailGateway {
    client: Option<EmailClient>,
    sender: Mailbox,
    notification_recipient: Mailbox,
    templates: Tera,
}

impl EmailGateway {
    pub fn new(
        client: Option<EmailClient>,
        sender: Mailbox,
        notification_recipient: Mailbox,
    ) -> Result<Self, anyhow::Error> {
        if client.is_none() {
            tracing::warn!(
                "No email API key configured. Contact and newsletter emails will not be sent."
            );
        }

        Ok(Self {
            client,
            sender,
            notification_recipient,
            templates: load_templates()?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    #[tracing::instrument(
        name = "Sending a contact notification",
        skip(self, submission),
        fields(
            submitter_email = %submission.email,
            submitter_name = %submission.name
        )
    )]
    pub async fn send_contact_notification(&self, submission: &ContactSubmission) -> bool {
        self.deliver(self.contact_notification(submission)).await
    }

    #[tracing::instrument(name = "Sending a newsletter welcome", skip(self))]
    pub async fn send_newsletter_welcome(&self, email: &EmailAddress) -> bool {
        self.deliver(self.newsletter_welcome(email)).await
    }

    fn contact_notification(
        &self,
        submission: &ContactSubmission,
    ) -> Result<OutboundEmail, anyhow::Error> {
        let mut ctx = tera::Context::new();
        ctx.insert("name", submission.name.as_ref());
        ctx.insert("email", submission.email.as_ref());
        ctx.insert("message", submission.message.as_ref());
        ctx.insert("received_at", &chrono::Utc::now().to_rfc2822());

        Ok(OutboundEmail {
            from: self.sender.clone(),
            to: self.notification_recipient.clone(),
            subject: format!("New contact form submission from {}", submission.name),
            text: self.render(CONTACT_TEXT, &ctx)?,
            html: self.render(CONTACT_HTML, &ctx)?,
            reply_to: Some(Mailbox::new(
                submission.email.clone(),
                Some(submission.name.to_string()),
            )),
        })
    }

    fn newsletter_welcome(&self, email: &EmailAddress) -> Result<OutboundEmail, anyhow::Error> {
        let studio = self.sender.name.as_deref().unwrap_or("our studio");
        let mut ctx = tera::Context::new();
        ctx.insert("email", email.as_ref());
        ctx.insert("studio", studio);

        Ok(OutboundEmail {
            from: self.sender.clone(),
            to: Mailbox::new(email.clone(), None),
            subject: format!("Welcome to the {studio} newsletter!"),
            text: self.render(WELCOME_TEXT, &ctx)?,
            html: self.render(WELCOME_HTML, &ctx)?,
            reply_to: None,
        })
    }

    fn render(&self, template: &str, ctx: &tera::Context) -> Result<String, anyhow::Error> {
        self.templates
            .render(template, ctx)
            .with_context(|| format!("Failed rendering email template {template}"))
    }

    async fn deliver(&self, email: Result<OutboundEmail, anyhow::Error>) -> bool {
        let Some(client) = &self.client else {
            tracing::debug!("Skipping send, the email provider is not configured.");
            return false;
        };

        let outcome = match email {
            Ok(email) => client.send_email(&email).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                tracing::info!("The email provider accepted the message.");
                true
            }
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to send email."
                );
                false
            }
        }
    }
}

fn load_templates() -> Result<Tera, anyhow::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            CONTACT_HTML,
            include_str!("../views/contact_notification.html"),
        ),
        (CONTACT_TEXT, include_str!("../views/contact_notification.txt")),
        (WELCOME_HTML, include_str!("../views/newsletter_welcome.html")),
        (WELCOME_TEXT, include_str!("../views/newsletter_welcome.txt")),
    ])
    .context("Failed to load email templates.")?;
    Ok(tera)
}
