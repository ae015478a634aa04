use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{subscriber::Subscriber, subscriber_email::SubscriberEmail};

#[tracing::instrument(name = "Find a subscriber by email", skip(db_pool))]
pub async fn find_subscriber(
    db_pool: &PgPool,
    email: &SubscriberEmail,
) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT email, subscribed_at
        FROM newsletter_subscribers
        WHERE email = $1
        "#,
    )
    .bind(email.as_ref())
    .map(map_subscriber_row)
    .fetch_optional(db_pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        err
    })
}

#[tracing::instrument(name = "Insert a new subscriber into the database", skip(db_pool))]
pub async fn insert_subscriber(
    db_pool: &PgPool,
    email: &SubscriberEmail,
    subscribed_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO newsletter_subscribers (email, subscribed_at)
        VALUES ($1, $2)
        "#,
    )
    .bind(email.as_ref())
    .bind(subscribed_at)
    .execute(db_pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        err
    })?;

    Ok(())
}

/// Deletes a subscriber. Deleting an absent email is not an error.
#[tracing::instrument(name = "Delete a subscriber from the database", skip(db_pool))]
pub async fn delete_subscriber(
    db_pool: &PgPool,
    email: &SubscriberEmail,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM newsletter_subscribers
        WHERE email = $1
        "#,
    )
    .bind(email.as_ref())
    .execute(db_pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        err
    })?;

    Ok(())
}

/// Lists subscribers ordered by enrollment time, earliest first. A positive
/// `limit` caps the read; `None` returns everyone.
#[tracing::instrument(name = "List subscribers", skip(db_pool))]
pub async fn list_subscribers(
    db_pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT email, subscribed_at
        FROM newsletter_subscribers
        ORDER BY subscribed_at ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .map(map_subscriber_row)
    .fetch_all(db_pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        err
    })
}

#[tracing::instrument(name = "Count subscribers", skip(db_pool))]
pub async fn count_subscribers(db_pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT COUNT(*) AS total
        FROM newsletter_subscribers
        "#,
    )
    .map(|row: PgRow| row.get("total"))
    .fetch_one(db_pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        err
    })
}

fn map_subscriber_row(row: PgRow) -> Subscriber {
    Subscriber {
        email: SubscriberEmail::parse(row.get("email")).unwrap(),
        subscribed_at: row.get("subscribed_at"),
    }
}
