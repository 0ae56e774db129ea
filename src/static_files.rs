use std::path::{Component, Path, PathBuf};

use actix_files::NamedFile;
use actix_web::http::Method;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};

use crate::routes::ApiResponse;

const APP_SHELL: &str = "index.html";

/// The built single-page app. Paths that don't name a file get the app shell
/// so client-side routing keeps working.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    root: Option<PathBuf>,
}

impl StaticAssets {
    pub fn disabled() -> Self {
        Self { root: None }
    }

    /// A missing directory only disables static serving.
    pub fn from_dir(dir: Option<&str>) -> Self {
        let Some(dir) = dir.map(str::trim).filter(|d| !d.is_empty()) else {
            return Self::disabled();
        };

        let root = PathBuf::from(dir);
        if !root.is_dir() {
            tracing::warn!(
                static_dir = %root.display(),
                "Static asset directory not found. Only the API will be served."
            );
            return Self::disabled();
        }

        tracing::info!(static_dir = %root.display(), "Serving static assets.");
        Self { root: Some(root) }
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    /// Maps a request path onto the asset root, dropping anything that could
    /// climb out of it.
    fn resolve(root: &Path, request_path: &str) -> PathBuf {
        let relative: PathBuf = Path::new(request_path.trim_start_matches('/'))
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        root.join(relative)
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// `NamedFile` supplies content type, ETag, Range and HEAD handling.
async fn file_response(
    req: &HttpRequest,
    path: &Path,
    cache_control: &'static str,
) -> Option<HttpResponse> {
    let file = NamedFile::open_async(path).await.ok()?;
    let mut response = file.into_response(req);
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));
    Some(response)
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Not found."))
}

pub async fn spa_fallback(req: HttpRequest, assets: web::Data<StaticAssets>) -> HttpResponse {
    let Some(root) = assets.root.as_deref() else {
        return not_found();
    };
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return not_found();
    }

    let candidate = StaticAssets::resolve(root, req.path());
    if candidate != root && is_file(&candidate).await {
        if let Some(response) = file_response(&req, &candidate, "public, max-age=3600").await {
            return response;
        }
    }

    match file_response(&req, &root.join(APP_SHELL), "no-cache").await {
        Some(response) => response,
        None => {
            tracing::warn!("The app shell is missing from the static asset directory.");
            not_found()
        }
    }
}
