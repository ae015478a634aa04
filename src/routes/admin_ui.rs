use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

/// The admin page for sending event announcements. A static page: it asks
/// for the API secret and talks to the newsletter endpoints from the
/// browser, so the secret never touches server-side session state.
#[tracing::instrument(name = "Admin send-event page handler")]
pub async fn admin_send_event_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("send_event_page.html"))
}
