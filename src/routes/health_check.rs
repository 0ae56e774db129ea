use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::configuration::Environment;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: String,
    environment: &'static str,
}

pub async fn health_check(environment: web::Data<Environment>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: environment.as_str(),
    })
}
