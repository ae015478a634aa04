mod admin_ui;
mod broadcast;
mod diagnostics;
mod health_check;
mod send_event;
mod subscribers;
mod subscriptions;
mod unsubscribe;

pub use admin_ui::admin_send_event_page;
pub use broadcast::handle_broadcast;
pub use diagnostics::handle_diagnostics;
pub use health_check::health_check;
pub use send_event::{handle_list_events, handle_send_event};
pub use subscribers::handle_list_subscribers;
pub use subscriptions::handle_create_subscription;
pub use unsubscribe::{handle_delete_subscription, handle_unsubscribe_page};
