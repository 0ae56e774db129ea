use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, web};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoVariant {
    Default,
    Gradient,
    Transparent,
}

impl LogoVariant {
    /// Unknown names resolve to the default logo.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "colored" | "coloured" | "gradient" => LogoVariant::Gradient,
            "transparent" => LogoVariant::Transparent,
            _ => LogoVariant::Default,
        }
    }

    pub fn svg(&self) -> &'static str {
        match self {
            LogoVariant::Default => include_str!("../../assets/logos/logo.svg"),
            LogoVariant::Gradient => include_str!("../../assets/logos/logo-gradient.svg"),
            LogoVariant::Transparent => include_str!("../../assets/logos/logo-transparent.svg"),
        }
    }
}

fn svg_response(variant: LogoVariant) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("image/svg+xml")
        .insert_header((CACHE_CONTROL, "public, max-age=86400"))
        .body(variant.svg())
}

pub async fn logo(variant: web::Path<String>) -> HttpResponse {
    svg_response(LogoVariant::from_name(&variant))
}

pub async fn default_logo() -> HttpResponse {
    svg_response(LogoVariant::Default)
}
