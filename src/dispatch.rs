//! Sequential, throttled delivery of one rendered email to a set of
//! subscribers. The fixed delays between send calls are a crude backpressure
//! mechanism against the mail provider's sending limits.

use std::time::Duration;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::EmailClient;

/// How a broadcast is split into provider calls. Selected through
/// configuration; both endpoints use the same configured strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// One send call per fixed-size group of recipients, every group member
    /// on the same call. Success and failure are tallied per whole group.
    Batch {
        batch_size: usize,
        delay: Duration,
    },
    /// One send call per recipient, with a smaller delay between calls and a
    /// per-recipient error descriptor on failure.
    Individual { delay: Duration },
}

#[derive(Debug)]
pub struct DispatchReport {
    pub total: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub errors: Vec<String>,
}

/// Delivers `html` to every recipient according to `strategy`.
///
/// A failed send call is counted and recorded, never propagated: one bad
/// recipient must not block the rest. Success and failure counts always sum
/// to the number of recipients considered.
#[tracing::instrument(
    name = "Dispatch an email to subscribers",
    skip(email_client, recipients, subject, html),
    fields(recipient_count = recipients.len())
)]
pub async fn dispatch_email(
    email_client: &EmailClient,
    recipients: &[SubscriberEmail],
    subject: &str,
    html: &str,
    strategy: DispatchStrategy,
) -> DispatchReport {
    let mut report = DispatchReport {
        total: recipients.len(),
        success_count: 0,
        fail_count: 0,
        errors: Vec::new(),
    };

    match strategy {
        DispatchStrategy::Batch { batch_size, delay } => {
            for (index, batch) in recipients.chunks(batch_size).enumerate() {
                if index > 0 {
                    tokio::time::sleep(delay).await;
                }

                match email_client.send_email(batch, subject, html).await {
                    Ok(()) => report.success_count += batch.len(),
                    Err(err) => {
                        tracing::error!("Batch email failed: {:?}", err);
                        report.fail_count += batch.len();
                        report
                            .errors
                            .push(format!("batch of {} recipients: {}", batch.len(), err));
                    }
                }
            }
        }
        DispatchStrategy::Individual { delay } => {
            for (index, recipient) in recipients.iter().enumerate() {
                if index > 0 {
                    tokio::time::sleep(delay).await;
                }

                match email_client
                    .send_email(std::slice::from_ref(recipient), subject, html)
                    .await
                {
                    Ok(()) => report.success_count += 1,
                    Err(err) => {
                        tracing::error!("Failed to send to {}: {:?}", recipient.as_ref(), err);
                        report.fail_count += 1;
                        report.errors.push(format!("{}: {}", recipient.as_ref(), err));
                    }
                }
            }
        }
    }

    report
}
