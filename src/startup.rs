use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::middleware::{Condition, DefaultHeaders, from_fn};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::configuration::{Environment, Settings};
use crate::cors::{CorsPolicy, cors_middleware};
use crate::email_gateway::EmailGateway;
use crate::routes::{
    api_not_found, catch_panics, contact, default_logo, health_check, json_error_handler, logo,
    subscribe,
};
use crate::static_files::{StaticAssets, spa_fallback};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self'; \
    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
    font-src 'self' https://fonts.gstatic.com; \
    img-src 'self' data: https:; \
    connect-src 'self'; \
    frame-ancestors 'none'";

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let environment = Environment::current().map_err(anyhow::Error::msg)?;
        Self::build_for(config, environment).await
    }

    pub async fn build_for(
        config: Settings,
        environment: Environment,
    ) -> Result<Self, anyhow::Error> {
        let gateway = config
            .email_client
            .gateway()
            .context("Invalid email client configuration.")?;
        let cors_policy = config.cors.policy();
        let assets = StaticAssets::from_dir(config.app.static_dir.as_deref());

        let address = format!("{}:{}", config.app.host, config.app.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}"))?;
        let port = listener.local_addr()?.port();
        tracing::info!(
            %address,
            environment = environment.as_str(),
            email_configured = gateway.is_configured(),
            static_assets = assets.is_enabled(),
            "Starting HTTP server."
        );

        let server = run(listener, gateway, cors_policy, assets, environment)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
        .add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains",
        ))
        .add(("Content-Security-Policy", CONTENT_SECURITY_POLICY))
}

pub fn run(
    listener: TcpListener,
    gateway: EmailGateway,
    cors_policy: CorsPolicy,
    assets: StaticAssets,
    environment: Environment,
) -> Result<Server, anyhow::Error> {
    let gateway = web::Data::new(gateway);
    let cors_policy = web::Data::new(cors_policy);
    let assets = web::Data::new(assets);
    let environment_data = web::Data::new(environment);
    let is_production = environment == Environment::Production;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(catch_panics))
            .wrap(Condition::new(is_production, security_headers()))
            .wrap(from_fn(cors_middleware))
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .route("/logo", web::get().to(default_logo))
                    .route("/logo/{variant}", web::get().to(logo))
                    .route("/contact", web::post().to(contact))
                    .route("/newsletter", web::post().to(subscribe))
                    .default_service(web::to(api_not_found)),
            )
            .default_service(web::to(spa_fallback))
            .app_data(gateway.clone())
            .app_data(cors_policy.clone())
            .app_data(assets.clone())
            .app_data(environment_data.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
