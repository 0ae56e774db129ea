use actix_web::{HttpResponse, web};

use super::{ApiError, ApiResponse};
use crate::domain::{ContactForm, ContactSubmission};
use crate::email_gateway::EmailGateway;

#[tracing::instrument(
    name = "Handling a contact form submission.",
    skip(form, gateway),
    fields(
        submitter_email = %form.email,
        submitter_name = %form.name
    )
)]
pub async fn contact(
    form: web::Json<ContactForm>,
    gateway: web::Data<EmailGateway>,
) -> Result<HttpResponse, ApiError> {
    let submission: ContactSubmission = form.into_inner().try_into()?;

    if !gateway.send_contact_notification(&submission).await {
        return Err(ApiError::ProviderUnavailable(
            "Failed to send your message. Please try again later.",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Thank you for your message! We'll get back to you soon.",
    )))
}
