use actix_web::{HttpResponse, web};

use super::{ApiError, ApiResponse};
use crate::domain::{NewsletterForm, NewsletterSubscription};
use crate::email_gateway::EmailGateway;

#[tracing::instrument(
    name = "Adding a newsletter subscriber.",
    skip(form, gateway),
    fields(subscriber_email = %form.email)
)]
pub async fn subscribe(
    form: web::Json<NewsletterForm>,
    gateway: web::Data<EmailGateway>,
) -> Result<HttpResponse, ApiError> {
    let subscription: NewsletterSubscription = form.into_inner().try_into()?;

    if !gateway.send_newsletter_welcome(&subscription.email).await {
        return Err(ApiError::ProviderUnavailable(
            "Failed to subscribe. Please try again later.",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Successfully subscribed to the newsletter!",
    )))
}
