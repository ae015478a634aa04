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
    store,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastBody {
    pub event_name: Option<String>,
    pub event_description: Option<String>,
    pub event_date: Option<String>,
    pub register_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub message: String,
    pub total_subscribers: usize,
    pub success_count: usize,
    pub fail_count: usize,
}

#[derive(thiserror::Error)]
pub enum BroadcastError {
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
    #[error("Invalid request format.")]
    MalformedRequest,
    #[error("Missing required fields: eventName, eventDescription, eventDate")]
    MissingFields,
    #[error("Failed to fetch subscribers.")]
    StoreFailed(#[source] sqlx::Error),
}

impl std::fmt::Debug for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for BroadcastError {
    fn status_code(&self) -> StatusCode {
        match self {
            BroadcastError::Auth(err) => err.status_code(),
            BroadcastError::MalformedRequest => StatusCode::BAD_REQUEST,
            BroadcastError::MissingFields => StatusCode::BAD_REQUEST,
            BroadcastError::StoreFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Announces an ad-hoc event (not necessarily in the catalog) to every
/// subscriber. The only durable effect is outbound email; nothing is written
/// to the store.
#[tracing::instrument(
    name = "Broadcasting an announcement handler",
    skip(request, body, db_pool, email_client, admin, strategy)
)]
pub async fn handle_broadcast(
    request: HttpRequest,
    body: web::Bytes,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    admin: web::Data<AdminSettings>,
    strategy: web::Data<DispatchStrategy>,
) -> Result<HttpResponse, BroadcastError> {
    validate_admin_token(&request, admin.api_secret.as_ref())?;

    let body: BroadcastBody =
        serde_json::from_slice(&body).map_err(|_| BroadcastError::MalformedRequest)?;
    let event = broadcast_details(body)?;

    let subscribers = store::list_subscribers(&db_pool, None)
        .await
        .map_err(BroadcastError::StoreFailed)?;

    if subscribers.is_empty() {
        return Ok(HttpResponse::Ok().json(BroadcastResponse {
            message: "No subscribers found.".to_string(),
            total_subscribers: 0,
            success_count: 0,
            fail_count: 0,
        }));
    }

    let recipients: Vec<SubscriberEmail> = subscribers
        .into_iter()
        .map(|subscriber| subscriber.email)
        .collect();

    let subject = format!("\u{1F4C5} New Event: {}", event.name);
    let report = dispatch_email(
        &email_client,
        &recipients,
        &subject,
        &event_email_html(&event),
        **strategy,
    )
    .await;

    Ok(HttpResponse::Ok().json(BroadcastResponse {
        message: "Broadcast complete".to_string(),
        total_subscribers: report.total,
        success_count: report.success_count,
        fail_count: report.fail_count,
    }))
}

fn broadcast_details(body: BroadcastBody) -> Result<EventDetails, BroadcastError> {
    let required = |field: Option<String>| field.filter(|value| !value.trim().is_empty());

    match (
        required(body.event_name),
        required(body.event_description),
        required(body.event_date),
    ) {
        (Some(name), Some(description), Some(date)) => Ok(EventDetails {
            name,
            description,
            date,
            register_url: body.register_url,
        }),
        _ => Err(BroadcastError::MissingFields),
    }
}
