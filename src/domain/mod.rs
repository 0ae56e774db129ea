mod contact_message;
mod contact_name;
mod contact_submission;
mod email_address;
mod newsletter_subscription;
mod validation;

pub use contact_message::ContactMessage;
pub use contact_name::ContactName;
pub use contact_submission::{ContactForm, ContactSubmission};
pub use email_address::EmailAddress;
pub use newsletter_subscription::{NewsletterForm, NewsletterSubscription};
pub use validation::{FieldError, ValidationError};
