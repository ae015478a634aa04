use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
pub struct SendEmailBody {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<EmailContent>,
}

#[derive(serde::Serialize)]
struct EmailAddress {
    email: String,
}

#[derive(serde::Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(serde::Serialize)]
struct EmailContent {
    content_type: String,
    value: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> EmailClient {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()
            .unwrap();

        EmailClient {
            http_client,
            base_url,
            sender,
            api_key,
        }
    }

    /// Sends one email to every recipient in `recipients` with a single call
    /// to the provider. A batch of addresses is joined into one request.
    pub async fn send_email(
        &self,
        recipients: &[SubscriberEmail],
        subject: &str,
        html_content: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/mail/send", self.base_url);
        let body = SendEmailBody {
            from: EmailAddress {
                email: String::from(self.sender.as_ref()),
            },
            personalizations: vec![Personalization {
                to: recipients
                    .iter()
                    .map(|recipient| EmailAddress {
                        email: String::from(recipient.as_ref()),
                    })
                    .collect(),
            }],
            subject: String::from(subject),
            content: vec![EmailContent {
                content_type: String::from("text/html"),
                value: String::from(html_content),
            }],
        };

        self.http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }
}
