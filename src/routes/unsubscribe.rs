use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{domain::subscriber_email::SubscriberEmail, store};

#[derive(Deserialize)]
pub struct UnsubscribeBody {
    pub email: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UnsubscribePageQuery {
    pub email: Option<String>,
}

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("Invalid request format.")]
    MalformedRequest,
    #[error("Please provide a valid email address.")]
    InvalidEmail,
    #[error("Failed to unsubscribe. Please try again.")]
    StoreFailed(#[source] sqlx::Error),
    // The store reported a successful delete but the row is still there,
    // e.g. a policy layer silently blocking deletes.
    #[error("Failed to unsubscribe. Please try again.")]
    DeleteNotApplied,
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for UnsubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::MalformedRequest => StatusCode::BAD_REQUEST,
            UnsubscribeError::InvalidEmail => StatusCode::BAD_REQUEST,
            UnsubscribeError::StoreFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UnsubscribeError::DeleteNotApplied => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// JSON unsubscribe used by the website's form. Idempotent: removing an
/// email that was never subscribed still succeeds.
#[tracing::instrument(name = "Deleting a subscriber handler", skip(body, db_pool))]
pub async fn handle_delete_subscription(
    body: web::Bytes,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, UnsubscribeError> {
    let body: UnsubscribeBody =
        serde_json::from_slice(&body).map_err(|_| UnsubscribeError::MalformedRequest)?;
    let email = SubscriberEmail::parse(body.email.unwrap_or_default()).map_err(|err| {
        tracing::warn!("Validation error: {:?}", err);
        UnsubscribeError::InvalidEmail
    })?;

    delete_and_verify(&db_pool, &email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "You have been unsubscribed from the ADSC newsletter."
    })))
}

/// Link-based unsubscribe: renders an HTML confirmation page driven by the
/// `email` query parameter. Same store semantics as the JSON variant.
#[tracing::instrument(name = "Unsubscribe confirmation page handler", skip(query, db_pool))]
pub async fn handle_unsubscribe_page(
    query: web::Query<UnsubscribePageQuery>,
    db_pool: web::Data<PgPool>,
) -> HttpResponse {
    let raw_email = match &query.email {
        Some(email) if !email.trim().is_empty() => email.clone(),
        _ => return unsubscribe_page_response(StatusCode::BAD_REQUEST, PageState::MissingEmail),
    };

    let email = match SubscriberEmail::parse(raw_email) {
        Ok(email) => email,
        Err(err) => {
            tracing::warn!("Validation error: {:?}", err);
            return unsubscribe_page_response(StatusCode::BAD_REQUEST, PageState::InvalidEmail);
        }
    };

    match delete_and_verify(&db_pool, &email).await {
        Ok(()) => unsubscribe_page_response(StatusCode::OK, PageState::Success),
        Err(err) => {
            tracing::error!("Failed to unsubscribe {}: {:?}", email.as_ref(), err);
            unsubscribe_page_response(StatusCode::INTERNAL_SERVER_ERROR, PageState::Error)
        }
    }
}

/// Deletes the subscriber and re-reads the store to make sure the row is
/// actually gone.
async fn delete_and_verify(
    db_pool: &PgPool,
    email: &SubscriberEmail,
) -> Result<(), UnsubscribeError> {
    store::delete_subscriber(db_pool, email)
        .await
        .map_err(UnsubscribeError::StoreFailed)?;

    let still_present = store::find_subscriber(db_pool, email)
        .await
        .map_err(UnsubscribeError::StoreFailed)?;

    if still_present.is_some() {
        tracing::error!(
            "Delete reported success but {} is still subscribed",
            email.as_ref()
        );
        return Err(UnsubscribeError::DeleteNotApplied);
    }

    Ok(())
}

enum PageState {
    Success,
    Error,
    MissingEmail,
    InvalidEmail,
}

fn unsubscribe_page_response(status: StatusCode, state: PageState) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(unsubscribe_page_html(state))
}

fn unsubscribe_page_html(state: PageState) -> String {
    let (heading, message) = match state {
        PageState::Success => (
            "Unsubscribed!",
            "You have been successfully unsubscribed from the ADSC newsletter.",
        ),
        PageState::Error => (
            "Something went wrong",
            "We could not unsubscribe you right now. Please try again later.",
        ),
        PageState::MissingEmail => (
            "Missing email",
            "No email address was provided. Use the unsubscribe link from one of our emails.",
        ),
        PageState::InvalidEmail => (
            "Invalid email",
            "The provided email address is not valid.",
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta http-equiv="content-type" content="text/html; charset=utf-8">
        <title>Unsubscribe - ADSC Newsletter</title>
    </head>
    <body style="margin: 0; padding: 40px 20px; background-color: #0a0a0a; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; text-align: center;">
        <h1 style="color: #fff;">{heading}</h1>
        <p style="color: #a3a3a3;">{message}</p>
        <p><a href="/" style="color: #f7ce00; text-decoration: none;">&larr; Back to Website</a></p>
    </body>
</html>"#
    )
}
