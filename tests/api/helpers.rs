use once_cell::sync::Lazy;
use secrecy::SecretString;
use studio_api::{
    configuration::{Environment, get_configuration},
    cors::UnmatchedOrigin,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_newsletter(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/newsletter", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub struct TestSettings {
    pub api_key: Option<&'static str>,
    pub environment: Environment,
    pub static_dir: Option<String>,
    pub unmatched_origin: UnmatchedOrigin,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            api_key: Some("test-api-key"),
            environment: Environment::Local,
            static_dir: None,
            unmatched_origin: UnmatchedOrigin::Deny,
        }
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestSettings::default()).await
}

pub async fn spawn_app_with(settings: TestSettings) -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let config = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.app.host = "127.0.0.1".into();
        c.app.port = 0;
        c.app.static_dir = settings.static_dir;
        c.email_client.base_url = email_server.uri();
        c.email_client.api_key = settings.api_key.map(SecretString::from);
        c.email_client.timeout_ms = 2_000;
        c.cors.unmatched_origin = settings.unmatched_origin;
        c
    };

    let app = Application::build_for(config, settings.environment)
        .await
        .expect("Failed to build application.");
    let port = app.get_port();
    let _ = tokio::spawn(app.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        email_server,
        api_client: reqwest::Client::new(),
    }
}

pub fn valid_contact() -> serde_json::Value {
    serde_json::json!({
        "name": "Ursula Le Guin",
        "email": "ursula_le_guin@gmail.com",
        "message": "We would love a quote for a new mobile app."
    })
}
