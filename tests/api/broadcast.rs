use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{received_recipients, TestApp, TEST_ADMIN_SECRET};

fn announcement_body() -> serde_json::Value {
    json!({
        "eventName": "Open Source Day",
        "eventDescription": "A full day of contributing to open source projects together.",
        "eventDate": "November 7, 2026",
        "registerUrl": "https://adsc-atmiya.in/events/open-source-day",
    })
}

#[tokio::test]
async fn broadcast_requires_a_valid_token() {
    let test_app = TestApp::spawn_app().await;
    test_app.seed_subscribers(1).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_broadcast(None, announcement_body()).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn broadcast_returns_400_when_required_fields_are_missing() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (json!({}), "missing every field"),
        (
            json!({ "eventName": "Open Source Day", "eventDate": "November 7, 2026" }),
            "missing eventDescription",
        ),
        (
            json!({ "eventName": "Open Source Day", "eventDescription": "..." }),
            "missing eventDate",
        ),
        (
            json!({ "eventName": " ", "eventDescription": "...", "eventDate": "November 7, 2026" }),
            "blank eventName",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app
            .post_broadcast(Some(TEST_ADMIN_SECRET), invalid_body)
            .await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn broadcast_in_batch_mode_makes_one_call_per_fifty_subscribers() {
    let test_app = TestApp::spawn_app_with(|config| {
        config.set_broadcast_strategy("batch".to_string());
    })
    .await;
    test_app.seed_subscribers(120).await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_broadcast(Some(TEST_ADMIN_SECRET), announcement_body())
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Broadcast complete");
    assert_eq!(body["totalSubscribers"], 120);
    assert_eq!(body["successCount"], 120);
    assert_eq!(body["failCount"], 0);

    // Batches of 50, 50 and 20, earliest subscribers first.
    let recipients = received_recipients(&test_app.email_server).await;
    let batch_sizes: Vec<usize> = recipients.iter().map(Vec::len).collect();
    assert_eq!(batch_sizes, vec![50, 50, 20]);
    assert_eq!(recipients[0][0], "subscriber1@test.com");
}

#[tokio::test]
async fn broadcast_in_batch_mode_counts_a_failed_call_as_the_whole_batch() {
    let test_app = TestApp::spawn_app_with(|config| {
        config.set_broadcast_strategy("batch".to_string());
    })
    .await;
    test_app.seed_subscribers(60).await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_broadcast(Some(TEST_ADMIN_SECRET), announcement_body())
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["totalSubscribers"], 60);
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["failCount"], 60);
}

#[tokio::test]
async fn broadcast_reports_zero_counts_without_subscribers() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_broadcast(Some(TEST_ADMIN_SECRET), announcement_body())
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No subscribers found.");
    assert_eq!(body["totalSubscribers"], 0);
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["failCount"], 0);
}

#[tokio::test]
async fn broadcast_writes_nothing_to_the_store() {
    let test_app = TestApp::spawn_app().await;
    test_app.seed_subscribers(2).await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;

    test_app
        .post_broadcast(Some(TEST_ADMIN_SECRET), announcement_body())
        .await;

    assert_eq!(
        test_app.stored_emails().await,
        vec!["subscriber1@test.com", "subscriber2@test.com"]
    );
}
