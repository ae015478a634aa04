use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, Secret};

#[derive(thiserror::Error)]
pub enum AdminAuthError {
    #[error("Unauthorized")]
    InvalidToken,
    #[error("Server configuration error.")]
    MissingSecret,
}

impl std::fmt::Debug for AdminAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for AdminAuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminAuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AdminAuthError::MissingSecret => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Checks the request's bearer token against the configured admin secret.
///
/// An unset secret is a deployment mistake, not an authorization outcome: it
/// maps to `MissingSecret` no matter what the caller sent. There is no
/// fallback credential.
pub fn validate_admin_token(
    request: &HttpRequest,
    secret: Option<&Secret<String>>,
) -> Result<(), AdminAuthError> {
    let secret = match secret {
        Some(secret) => secret,
        None => {
            tracing::error!("The admin API secret is not configured");
            return Err(AdminAuthError::MissingSecret);
        }
    };

    let token = extract_bearer_token(request).ok_or(AdminAuthError::InvalidToken)?;

    if token != secret.expose_secret() {
        return Err(AdminAuthError::InvalidToken);
    }

    Ok(())
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}
