use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use sqlx::PgPool;

use crate::{
    authentication::{validate_admin_token, AdminAuthError},
    config::AdminSettings,
    store,
};

#[derive(thiserror::Error)]
pub enum ListSubscribersError {
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
    #[error("Failed to fetch subscribers.")]
    StoreFailed(#[source] sqlx::Error),
}

impl std::fmt::Debug for ListSubscribersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for ListSubscribersError {
    fn status_code(&self) -> StatusCode {
        match self {
            ListSubscribersError::Auth(err) => err.status_code(),
            ListSubscribersError::StoreFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Admin-only listing of every subscriber, earliest enrollment first.
#[tracing::instrument(name = "Listing subscribers handler", skip(request, db_pool, admin))]
pub async fn handle_list_subscribers(
    request: HttpRequest,
    db_pool: web::Data<PgPool>,
    admin: web::Data<AdminSettings>,
) -> Result<HttpResponse, ListSubscribersError> {
    validate_admin_token(&request, admin.api_secret.as_ref())?;

    let subscribers = store::list_subscribers(&db_pool, None)
        .await
        .map_err(ListSubscribersError::StoreFailed)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "count": subscribers.len(),
        "subscribers": subscribers,
    })))
}
