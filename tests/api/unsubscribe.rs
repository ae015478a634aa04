use chrono::Utc;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn unsubscribe_removes_the_subscriber() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("frank@test.com", Utc::now()).await;

    // Same address, different casing and whitespace.
    let response = test_app
        .delete_subscription(json!({ "email": " Frank@Test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "You have been unsubscribed from the ADSC newsletter."
    );
    assert!(test_app.stored_emails().await.is_empty());
}

#[tokio::test]
async fn unsubscribe_is_idempotent_for_an_unknown_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .delete_subscription(json!({ "email": "never-subscribed@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.stored_emails().await.is_empty());
}

#[tokio::test]
async fn unsubscribe_returns_400_when_email_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (json!({}), "missing email parameter"),
        (json!({ "email": "not-an-email" }), "invalid email"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.delete_subscription(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn unsubscribe_does_not_touch_other_subscribers() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("frank@test.com", Utc::now()).await;
    test_app.insert_subscriber("other@test.com", Utc::now()).await;

    test_app
        .delete_subscription(json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(test_app.stored_emails().await, vec!["other@test.com"]);
}

#[tokio::test]
async fn unsubscribe_page_confirms_the_removal() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("frank@test.com", Utc::now()).await;

    let response = test_app
        .get_unsubscribe_page("?email=frank%40test.com")
        .await;

    assert_eq!(200, response.status().as_u16());

    let html = response.text().await.unwrap();
    assert!(html.contains("successfully unsubscribed"));
    assert!(test_app.stored_emails().await.is_empty());
}

#[tokio::test]
async fn unsubscribe_page_rejects_a_missing_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_unsubscribe_page("").await;

    assert_eq!(400, response.status().as_u16());

    let html = response.text().await.unwrap();
    assert!(html.contains("No email address was provided"));
}

#[tokio::test]
async fn unsubscribe_page_rejects_an_invalid_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_unsubscribe_page("?email=not-an-email").await;

    assert_eq!(400, response.status().as_u16());

    let html = response.text().await.unwrap();
    assert!(html.contains("not valid"));
}
