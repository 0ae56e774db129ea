use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{HttpResponse, web};
use reqwest::Url;
use serde::Deserialize;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With, Accept, Origin";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

/// What to do with an `Origin` that matches neither the allow-list nor a
/// suffix rule.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedOrigin {
    #[default]
    Deny,
    AllowAny,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// `*` without credentials: no `Origin` header, or the permissive
    /// fallback for unmatched origins.
    AllowAny,
    /// Echo this exact origin back; credentials allowed.
    Echo(String),
    Deny,
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    allowed_suffixes: Vec<String>,
    unmatched: UnmatchedOrigin,
}

impl CorsPolicy {
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_suffixes: Vec<String>,
        unmatched: UnmatchedOrigin,
    ) -> Self {
        let allowed_origins = allowed_origins
            .into_iter()
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        let allowed_suffixes = allowed_suffixes
            .into_iter()
            .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            allowed_origins,
            allowed_suffixes,
            unmatched,
        }
    }

    pub fn decide(&self, origin: Option<&str>) -> OriginDecision {
        let Some(origin) = origin else {
            return OriginDecision::AllowAny;
        };

        if self.allowed_origins.iter().any(|o| o == origin) || self.matches_suffix(origin) {
            return OriginDecision::Echo(origin.to_string());
        }

        match self.unmatched {
            UnmatchedOrigin::Deny => OriginDecision::Deny,
            UnmatchedOrigin::AllowAny => OriginDecision::AllowAny,
        }
    }

    fn matches_suffix(&self, origin: &str) -> bool {
        let Some(host) = Url::parse(origin)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        else {
            return false;
        };

        self.allowed_suffixes.iter().any(|suffix| {
            host == *suffix
                || host
                    .strip_suffix(suffix.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

fn apply_decision(headers: &mut HeaderMap, decision: &OriginDecision) {
    headers.append(header::VARY, HeaderValue::from_static("Origin"));

    match decision {
        OriginDecision::AllowAny => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
        OriginDecision::Echo(origin) => {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
            }
        }
        OriginDecision::Deny => {}
    }
}

fn apply_preflight(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
    );
}

/// Attaches the origin decision to every response and answers `OPTIONS`
/// preflights directly with `204 No Content`.
pub async fn cors_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .map(|value| value.to_str().unwrap_or_default().to_string());

    let decision = match req.app_data::<web::Data<CorsPolicy>>() {
        Some(policy) => policy.decide(origin.as_deref()),
        None => OriginDecision::Deny,
    };

    if decision == OriginDecision::Deny {
        tracing::warn!(origin = ?origin, "Rejected cross-origin request.");
    }

    if req.method() == Method::OPTIONS {
        let mut response = HttpResponse::NoContent().finish();
        apply_decision(response.headers_mut(), &decision);
        apply_preflight(response.headers_mut());
        return Ok(req.into_response(response).map_into_right_body());
    }

    let mut response = next.call(req).await?;
    apply_decision(response.headers_mut(), &decision);
    Ok(response.map_into_left_body())
}
