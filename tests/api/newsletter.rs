use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, method, path},
};

use crate::helpers::spawn_app;

#[tokio::test]
async fn newsletter_returns_200_and_sends_a_welcome_email() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_newsletter(&serde_json::json!({"email": "reader@example.com"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let request = &app.email_server.received_requests().await.unwrap()[0];
    let sent: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(sent["to"][0], "reader@example.com");
}

#[tokio::test]
async fn newsletter_returns_400_for_an_invalid_email() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for body in [
        serde_json::json!({"email": "not-an-email"}),
        serde_json::json!({"email": ""}),
        serde_json::json!({}),
    ] {
        let response = app.post_newsletter(&body).await;

        assert_eq!(400, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["field"], "email");
    }
}

#[tokio::test]
async fn subscribing_twice_succeeds_twice() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let body = serde_json::json!({"email": "reader@example.com"});
    let first = app.post_newsletter(&body).await;
    let second = app.post_newsletter(&body).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());
}

#[tokio::test]
async fn newsletter_fails_gracefully_when_the_provider_fails() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_newsletter(&serde_json::json!({"email": "reader@example.com"}))
        .await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
