use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;

/// A stored newsletter enrollment. A subscriber is either present or absent;
/// there is no update operation.
#[derive(Debug, serde::Serialize)]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
}
