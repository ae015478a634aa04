use chrono::{Duration, Utc};

use crate::helpers::{TestApp, TEST_ADMIN_SECRET};

#[tokio::test]
async fn subscriber_listing_requires_a_valid_token() {
    let test_app = TestApp::spawn_app().await;

    let without_token = test_app.get_subscribers(None).await;
    let with_wrong_token = test_app.get_subscribers(Some("wrong-secret")).await;

    assert_eq!(401, without_token.status().as_u16());
    assert_eq!(401, with_wrong_token.status().as_u16());
}

#[tokio::test]
async fn subscriber_listing_returns_count_and_enrollment_order() {
    let test_app = TestApp::spawn_app().await;
    let now = Utc::now();
    test_app
        .insert_subscriber("late@test.com", now + Duration::seconds(30))
        .await;
    test_app.insert_subscriber("early@test.com", now).await;

    let response = test_app.get_subscribers(Some(TEST_ADMIN_SECRET)).await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["subscribers"][0]["email"], "early@test.com");
    assert_eq!(body["subscribers"][1]["email"], "late@test.com");
    assert!(body["subscribers"][0]["subscribed_at"].is_string());
}

#[tokio::test]
async fn admin_endpoints_fail_when_the_secret_is_not_configured() {
    let test_app = TestApp::spawn_app_with(|config| config.set_admin_secret(None)).await;

    // A missing secret is a server misconfiguration, not an auth outcome:
    // even a caller who happens to guess right gets a 500.
    let response = test_app.get_subscribers(Some(TEST_ADMIN_SECRET)).await;

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn event_listing_returns_the_catalog_summaries() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_events(Some(TEST_ADMIN_SECRET)).await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    let events = body["events"].as_array().unwrap();

    assert!(!events.is_empty());
    for event in events {
        assert!(event["id"].is_string());
        assert!(event["name"].is_string());
        assert!(event["date"].is_string());
        assert!(event["category"].is_string());
        // The listing is a projection: no description or URLs.
        assert!(event.get("description").is_none());
    }
}

#[tokio::test]
async fn event_listing_requires_a_valid_token() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_events(Some("wrong-secret")).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn diagnostics_reports_settings_and_store_status() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("frank@test.com", Utc::now()).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/newsletter/test", test_app.address))
        .bearer_auth(TEST_ADMIN_SECRET)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["settings"]["admin_api_secret"], "set");
    assert_eq!(body["store"]["status"], "connected");
    assert_eq!(body["store"]["subscriber_count"], 1);
    assert_eq!(body["email_test"]["status"], "skipped");
}
