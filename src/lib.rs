pub mod configuration;
pub mod cors;
pub mod domain;
pub mod email_client;
pub mod email_gateway;
pub mod routes;
pub mod startup;
pub mod static_files;
pub mod telemetry;
