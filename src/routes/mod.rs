mod contact;
mod errors;
mod health_check;
mod helpers;
mod logo;
mod newsletter;

pub use contact::contact;
pub use errors::{ApiError, catch_panics};
pub use health_check::health_check;
pub use helpers::{ApiResponse, api_not_found, error_chain_fmt, json_error_handler};
pub use logo::{LogoVariant, default_logo, logo};
pub use newsletter::subscribe;
