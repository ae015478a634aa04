use chrono::{DateTime, Utc};
use reqwest::Response;
use secrecy::Secret;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use wiremock::MockServer;

use adsc_newsletter::{
    config::{get_configuration, DatabaseSettings, Settings},
    startup::{get_connection_db_pool, Application},
};

pub const TEST_ADMIN_SECRET: &str = "test-admin-secret";

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub db_pool: PgPool,
    pub email_server: MockServer,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with(|_| {}).await
    }

    /// Spawns the application against a fresh database and a mock mail
    /// provider. `customize` runs after the test defaults, so individual
    /// tests can override any setting (rate limits, strategy, secret).
    pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));
        let email_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_email_client_base_url(email_server.uri());
        config.set_admin_secret(Some(Secret::new(TEST_ADMIN_SECRET.to_string())));
        // Roomy default budget so unrelated tests never trip the limiter,
        // and no inter-send sleeps slowing the suite down.
        config.set_rate_limit(500, 60);
        config.set_broadcast_delays(0, 0);

        customize(&mut config);

        let db_pool = configure_db(&mut config.database, db_test_name.clone()).await;

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config: config.clone(),
            db_pool,
            email_server,
        }
    }

    pub async fn post_subscription(&self, body: serde_json::Value) -> Response {
        self.post_subscription_from(body, "203.0.113.1").await
    }

    pub async fn post_subscription_from(
        &self,
        body: serde_json::Value,
        client_ip: &str,
    ) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/newsletter", self.address);

        client
            .post(&url)
            .header("x-forwarded-for", client_ip)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscription_raw(&self, body: String) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/newsletter", self.address);

        client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_subscription(&self, body: serde_json::Value) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/newsletter", self.address);

        client
            .delete(&url)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_unsubscribe_page(&self, query: &str) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/newsletter{}", self.address, query);

        client
            .get(&url)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscribers(&self, token: Option<&str>) -> Response {
        self.get_with_token(format!("{}/newsletter/subscribers", self.address), token)
            .await
    }

    pub async fn get_events(&self, token: Option<&str>) -> Response {
        self.get_with_token(format!("{}/newsletter/send-event", self.address), token)
            .await
    }

    pub async fn post_send_event(
        &self,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        self.post_with_token(format!("{}/newsletter/send-event", self.address), token, body)
            .await
    }

    pub async fn post_broadcast(&self, token: Option<&str>, body: serde_json::Value) -> Response {
        self.post_with_token(format!("{}/newsletter/broadcast", self.address), token, body)
            .await
    }

    async fn get_with_token(&self, url: String, token: Option<&str>) -> Response {
        let client = reqwest::Client::new();
        let mut request = client.get(&url);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request.")
    }

    async fn post_with_token(
        &self,
        url: String,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        let client = reqwest::Client::new();
        let mut request = client.post(&url).json(&body);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request.")
    }

    /// Inserts a subscriber row directly, bypassing the endpoint.
    pub async fn insert_subscriber(&self, email: &str, subscribed_at: DateTime<Utc>) {
        sqlx::query(
            r#"
            INSERT INTO newsletter_subscribers (email, subscribed_at)
            VALUES ($1, $2)
            "#,
        )
        .bind(email)
        .bind(subscribed_at)
        .execute(&self.db_pool)
        .await
        .expect("Failed to insert a test subscriber.");
    }

    /// Seeds `count` subscribers with ascending subscription times, so
    /// `subscriber1@test.com` is always the earliest.
    pub async fn seed_subscribers(&self, count: i64) {
        sqlx::query(
            r#"
            INSERT INTO newsletter_subscribers (email, subscribed_at)
            SELECT 'subscriber' || n || '@test.com', NOW() + (n * INTERVAL '1 second')
            FROM generate_series(1, $1) AS n
            "#,
        )
        .bind(count)
        .execute(&self.db_pool)
        .await
        .expect("Failed to seed test subscribers.");
    }

    pub async fn stored_emails(&self) -> Vec<String> {
        sqlx::query_scalar(
            r#"
            SELECT email
            FROM newsletter_subscribers
            ORDER BY subscribed_at ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .expect("Query to fetch subscribers failed.")
    }
}

/// Recipient addresses of every send call the mock mail provider received,
/// one `Vec` per call, in arrival order.
pub async fn received_recipients(email_server: &MockServer) -> Vec<Vec<String>> {
    email_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();

            body["personalizations"][0]["to"]
                .as_array()
                .unwrap()
                .iter()
                .map(|recipient| recipient["email"].as_str().unwrap().to_string())
                .collect()
        })
        .collect()
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_db_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
