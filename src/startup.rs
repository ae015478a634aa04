use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::event_catalog::EventCatalog;
use crate::rate_limit::RateLimiter;
use crate::routes::{
    admin_send_event_page, handle_broadcast, handle_create_subscription,
    handle_delete_subscription, handle_diagnostics, handle_list_events, handle_list_subscribers,
    handle_send_event, handle_unsubscribe_page, health_check,
};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy_with(config.get_db_options());
        let sender_email = config
            .get_email_client_sender()
            .expect("Sender email is not valid");
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.get_email_client_api(),
            None,
        );

        let listener =
            TcpListener::bind(config.get_address()).expect("Failed to bind the address.");
        let port = listener.local_addr().unwrap().port();
        let server = run(
            listener,
            db_pool,
            email_client,
            EventCatalog::builtin(),
            config,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    email_client: EmailClient,
    event_catalog: EventCatalog,
    config: Settings,
) -> Result<Server, std::io::Error> {
    let dispatch_strategy = config
        .broadcast
        .get_dispatch_strategy()
        .expect("Invalid broadcast strategy in the configuration.");
    let rate_limiter = web::Data::new(RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.get_window(),
    ));

    let db_pool = web::Data::new(db_pool);
    let email_client = web::Data::new(email_client);
    let event_catalog = web::Data::new(event_catalog);
    let admin = web::Data::new(config.admin.clone());
    let dispatch_strategy = web::Data::new(dispatch_strategy);
    let settings = web::Data::new(config);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/newsletter", web::post().to(handle_create_subscription))
            .route("/newsletter", web::delete().to(handle_delete_subscription))
            .route("/newsletter", web::get().to(handle_unsubscribe_page))
            .route(
                "/newsletter/subscribers",
                web::get().to(handle_list_subscribers),
            )
            .route("/newsletter/send-event", web::get().to(handle_list_events))
            .route("/newsletter/send-event", web::post().to(handle_send_event))
            .route("/newsletter/broadcast", web::post().to(handle_broadcast))
            .route("/newsletter/test", web::get().to(handle_diagnostics))
            .route("/admin/send-event", web::get().to(admin_send_event_page))
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(event_catalog.clone())
            .app_data(admin.clone())
            .app_data(rate_limiter.clone())
            .app_data(dispatch_strategy.clone())
            .app_data(settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
