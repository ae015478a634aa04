use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    domain::subscriber_email::SubscriberEmail,
    email_client::EmailClient,
    email_templates::welcome_email_html,
    rate_limit::{client_key, RateLimiter},
    store,
};

const WELCOME_SUBJECT: &str = "\u{1F389} Welcome to ADSC Newsletter!";

#[derive(Deserialize)]
pub struct SubscribeBody {
    pub email: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Invalid request format.")]
    MalformedRequest,
    #[error("Please provide a valid email address.")]
    InvalidEmail,
    #[error("This email is already subscribed!")]
    DuplicateSubscriber,
    #[error("Failed to subscribe. Please try again.")]
    StoreFailed(#[source] sqlx::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SubscribeError::MalformedRequest => StatusCode::BAD_REQUEST,
            SubscribeError::InvalidEmail => StatusCode::BAD_REQUEST,
            SubscribeError::DuplicateSubscriber => StatusCode::CONFLICT,
            SubscribeError::StoreFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Enrolls a new subscriber. Every gate is checked in order and fails fast:
/// rate limit, body shape, email validity, duplication, store write. The
/// welcome email at the end is best-effort and never fails the request.
#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(request, body, db_pool, email_client, rate_limiter)
)]
pub async fn handle_create_subscription(
    request: HttpRequest,
    body: web::Bytes,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    rate_limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, SubscribeError> {
    let rate_limit_key = client_key(&request);
    if !rate_limiter.check(&rate_limit_key).is_allowed() {
        tracing::warn!("Rate limit exceeded for client {}", rate_limit_key);
        return Err(SubscribeError::RateLimited);
    }

    let body: SubscribeBody =
        serde_json::from_slice(&body).map_err(|_| SubscribeError::MalformedRequest)?;
    let email = SubscriberEmail::parse(body.email.unwrap_or_default()).map_err(|err| {
        tracing::warn!("Validation error: {:?}", err);
        SubscribeError::InvalidEmail
    })?;

    let existing_subscriber = store::find_subscriber(&db_pool, &email)
        .await
        .map_err(SubscribeError::StoreFailed)?;

    if existing_subscriber.is_some() {
        return Err(SubscribeError::DuplicateSubscriber);
    }

    store::insert_subscriber(&db_pool, &email, Utc::now())
        .await
        .map_err(SubscribeError::StoreFailed)?;

    // The subscription already succeeded; a failed welcome email is logged
    // and never surfaces to the caller.
    if let Err(err) = send_welcome_email(&email_client, &email).await {
        tracing::error!(
            "Failed to send the welcome email to {}: {:?}",
            email.as_ref(),
            err
        );
    }

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Successfully subscribed to the newsletter!"
    })))
}

#[tracing::instrument(
    name = "Send a welcome email to a new subscriber",
    skip(email_client, email),
    fields(subscriber_email = %email.as_ref())
)]
async fn send_welcome_email(
    email_client: &EmailClient,
    email: &SubscriberEmail,
) -> Result<(), reqwest::Error> {
    let html_body = welcome_email_html(email.as_ref());

    email_client
        .send_email(std::slice::from_ref(email), WELCOME_SUBJECT, &html_body)
        .await
}
