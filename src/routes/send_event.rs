use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    authentication::{validate_admin_token, AdminAuthError},
    config::AdminSettings,
    dispatch::{dispatch_email, DispatchStrategy},
    domain::subscriber_email::SubscriberEmail,
    email_client::EmailClient,
    email_templates::{event_email_html, EventDetails},
    event_catalog::{Event, EventCatalog},
    store,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEventBody {
    pub event_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEventResponse {
    pub message: String,
    pub event_name: String,
    pub event_date: String,
    pub total_subscribers: usize,
    pub success_count: usize,
    pub fail_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(thiserror::Error)]
pub enum SendEventError {
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
    #[error("Invalid request format.")]
    MalformedRequest,
    #[error("Missing required field: eventId")]
    MissingEventId,
    #[error("Event with ID \"{0}\" not found.")]
    EventNotFound(String),
    #[error("Failed to fetch subscribers.")]
    StoreFailed(#[source] sqlx::Error),
}

impl std::fmt::Debug for SendEventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for SendEventError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendEventError::Auth(err) => err.status_code(),
            SendEventError::MalformedRequest => StatusCode::BAD_REQUEST,
            SendEventError::MissingEventId => StatusCode::BAD_REQUEST,
            SendEventError::EventNotFound(_) => StatusCode::NOT_FOUND,
            SendEventError::StoreFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Admin-only listing of the events available for a broadcast. Catalog only,
/// no store access.
#[tracing::instrument(name = "Listing events handler", skip(request, event_catalog, admin))]
pub async fn handle_list_events(
    request: HttpRequest,
    event_catalog: web::Data<EventCatalog>,
    admin: web::Data<AdminSettings>,
) -> Result<HttpResponse, SendEventError> {
    validate_admin_token(&request, admin.api_secret.as_ref())?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "events": event_catalog.summaries(),
    })))
}

/// Announces a catalog event to the subscriber list. With a positive `limit`
/// only the earliest-subscribed recipients are considered, favoring
/// long-standing subscribers on a partial send.
#[tracing::instrument(
    name = "Sending an event announcement handler",
    skip(request, body, db_pool, email_client, event_catalog, admin, strategy)
)]
pub async fn handle_send_event(
    request: HttpRequest,
    body: web::Bytes,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    event_catalog: web::Data<EventCatalog>,
    admin: web::Data<AdminSettings>,
    strategy: web::Data<DispatchStrategy>,
) -> Result<HttpResponse, SendEventError> {
    validate_admin_token(&request, admin.api_secret.as_ref())?;

    let body: SendEventBody =
        serde_json::from_slice(&body).map_err(|_| SendEventError::MalformedRequest)?;
    let event_id = match body.event_id {
        Some(event_id) if !event_id.is_empty() => event_id,
        _ => return Err(SendEventError::MissingEventId),
    };

    let event = event_catalog
        .find_by_id(&event_id)
        .ok_or(SendEventError::EventNotFound(event_id))?;

    let limit = body.limit.filter(|limit| *limit > 0);
    let subscribers = store::list_subscribers(&db_pool, limit)
        .await
        .map_err(SendEventError::StoreFailed)?;

    if subscribers.is_empty() {
        return Ok(HttpResponse::Ok().json(SendEventResponse {
            message: "No subscribers found.".to_string(),
            event_name: event.name.clone(),
            event_date: event.date.clone(),
            total_subscribers: 0,
            success_count: 0,
            fail_count: 0,
            errors: None,
        }));
    }

    let recipients: Vec<SubscriberEmail> = subscribers
        .into_iter()
        .map(|subscriber| subscriber.email)
        .collect();

    tracing::info!(
        "Sending \"{}\" announcement to {} subscribers",
        event.name,
        recipients.len()
    );

    let report = dispatch_email(
        &email_client,
        &recipients,
        &announcement_subject(event),
        &event_email_html(&announcement_details(event)),
        **strategy,
    )
    .await;

    Ok(HttpResponse::Ok().json(SendEventResponse {
        message: "Event notification sent!".to_string(),
        event_name: event.name.clone(),
        event_date: event.date.clone(),
        total_subscribers: report.total,
        success_count: report.success_count,
        fail_count: report.fail_count,
        errors: (!report.errors.is_empty()).then_some(report.errors),
    }))
}

pub fn announcement_subject(event: &Event) -> String {
    format!("\u{1F4C5} New Event: {}", event.name)
}

fn announcement_details(event: &Event) -> EventDetails {
    EventDetails {
        name: event.name.clone(),
        description: event.description.clone(),
        date: event.date.clone(),
        register_url: event.signup_url().map(str::to_string),
    }
}
