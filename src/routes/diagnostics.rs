use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    authentication::{validate_admin_token, AdminAuthError},
    config::{AdminSettings, Settings},
    domain::subscriber_email::SubscriberEmail,
    email_client::EmailClient,
    store,
};

#[derive(Deserialize, Debug)]
pub struct DiagnosticsQuery {
    #[serde(rename = "testEmail")]
    pub test_email: Option<String>,
}

/// Admin-only health report for the newsletter stack: settings presence, a
/// store probe and (when `testEmail` is given) a probe email. Secret values
/// are never included, only whether they are set.
#[tracing::instrument(
    name = "Newsletter diagnostics handler",
    skip(request, query, db_pool, email_client, admin, settings)
)]
pub async fn handle_diagnostics(
    request: HttpRequest,
    query: web::Query<DiagnosticsQuery>,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    admin: web::Data<AdminSettings>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, AdminAuthError> {
    validate_admin_token(&request, admin.api_secret.as_ref())?;

    let set_or_not = |is_set: bool| if is_set { "set" } else { "not set" };
    let settings_report = serde_json::json!({
        "email_sender": set_or_not(!settings.email_client.sender_email.is_empty()),
        "email_api_key": "set",
        "database": set_or_not(!settings.get_db_name().is_empty()),
        "admin_api_secret": set_or_not(admin.api_secret.is_some()),
    });

    let store_report = match store::count_subscribers(&db_pool).await {
        Ok(count) => serde_json::json!({
            "status": "connected",
            "subscriber_count": count,
        }),
        Err(err) => {
            tracing::error!("Store probe failed: {:?}", err);
            serde_json::json!({ "status": "error" })
        }
    };

    let email_report = match &query.test_email {
        Some(raw_email) => match SubscriberEmail::parse(raw_email.clone()) {
            Ok(email) => {
                let probe = email_client
                    .send_email(
                        std::slice::from_ref(&email),
                        "ADSC Newsletter Test Email",
                        "<p>If you received this, the email configuration works.</p>",
                    )
                    .await;

                match probe {
                    Ok(()) => serde_json::json!({ "status": "sent", "to": email.as_ref() }),
                    Err(err) => {
                        tracing::error!("Probe email failed: {:?}", err);
                        serde_json::json!({ "status": "failed", "to": email.as_ref() })
                    }
                }
            }
            Err(_) => serde_json::json!({ "status": "invalid test address" }),
        },
        None => serde_json::json!({
            "status": "skipped",
            "hint": "Add ?testEmail=your@email.com to test email sending",
        }),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "settings": settings_report,
        "store": store_report,
        "email_test": email_report,
    })))
}
