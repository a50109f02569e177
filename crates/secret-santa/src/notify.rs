//! Assignment notifications.
//!
//! The [`Notifier`] trait is the seam between the draw and the outside world.
//! [`MailgunNotifier`] is the production adapter: it owns transport details
//! only (request form, basic auth, timeout and HTTP error mapping). Message
//! content is built by [`compose_message`] so it can be checked without a
//! network.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use tracing::info;

use crate::error::NotifyError;
use crate::participant::{Assignment, AssignmentBatch};

/// Public Mailgun API base URL.
pub const MAILGUN_API_BASE: &str = "https://api.mailgun.net";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_PREVIEW_LIMIT: usize = 200;
const SUBJECT: &str = "Your Secret Santa assignment";

/// Delivers one assignment to its santa.
pub trait Notifier {
    /// Notifies the santa of `assignment` who they are buying for.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message cannot be delivered.
    fn notify(&self, assignment: &Assignment) -> Result<(), NotifyError>;
}

/// Notifies every santa in `batch`, one after another.
///
/// Delivery stops at the first failure. Santas notified before the failure
/// stay notified.
///
/// # Errors
///
/// Returns the first [`NotifyError`] raised by `notifier`.
pub fn notify_all<N>(notifier: &N, batch: &AssignmentBatch) -> Result<usize, NotifyError>
where
    N: Notifier + ?Sized,
{
    let mut sent = 0;
    for assignment in batch {
        notifier.notify(assignment)?;
        sent += 1;
        info!(santa = assignment.santa().name(), "notification sent");
    }
    Ok(sent)
}

/// Mailgun sending domain and API key.
#[derive(Clone, PartialEq, Eq)]
pub struct MailgunCredentials {
    domain: String,
    api_key: String,
}

impl MailgunCredentials {
    /// Creates credentials for `domain`.
    #[must_use]
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns the sending domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for MailgunCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailgunCredentials")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Sender mailbox.
    pub from: String,
    /// Santa's address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body naming the recipient.
    pub text: String,
}

/// Builds the email telling the santa of `assignment` who they are buying for.
///
/// # Errors
///
/// Returns [`NotifyError::MissingAddress`] when the santa has no address.
///
/// # Example
///
/// ```
/// use secret_santa::{Assignment, Participant, compose_message};
///
/// let santa = Participant::new("Alice", Some("alice@example.com".to_owned()));
/// let recipient = Participant::new("Bob", Some("bob@example.com".to_owned()));
/// let assignment = Assignment::new(santa, recipient).expect("distinct");
///
/// let message = compose_message(&assignment, "mg.example.com").expect("santa has an address");
/// assert_eq!(message.to, "alice@example.com");
/// assert!(message.text.contains("Bob"));
/// assert!(message.text.contains("bob@example.com"));
/// ```
pub fn compose_message(assignment: &Assignment, domain: &str) -> Result<Message, NotifyError> {
    let santa = assignment.santa();
    let to = santa
        .address()
        .filter(|address| !address.trim().is_empty())
        .ok_or_else(|| NotifyError::MissingAddress {
            santa: santa.name().to_owned(),
        })?;

    let recipient = assignment.recipient();
    let recipient_line = match recipient.address() {
        Some(address) => format!("{} ({address})", recipient.name()),
        None => recipient.name().to_owned(),
    };

    Ok(Message {
        from: format!("Secret Santa <secret-santa@{domain}>"),
        to: to.to_owned(),
        subject: SUBJECT.to_owned(),
        text: format!(
            "Hi {santa}!\n\nYou are the Secret Santa for {recipient_line}.\n\nKeep it secret!\n",
            santa = santa.name()
        ),
    })
}

/// Notifier that sends each message through the Mailgun HTTP API.
pub struct MailgunNotifier {
    client: Client,
    endpoint: Url,
    credentials: MailgunCredentials,
}

impl MailgunNotifier {
    /// Builds a notifier against the public Mailgun API.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the endpoint or HTTP client cannot be
    /// built.
    pub fn new(credentials: MailgunCredentials) -> Result<Self, NotifyError> {
        Self::with_base_url(credentials, MAILGUN_API_BASE, DEFAULT_TIMEOUT)
    }

    /// Builds a notifier against `base_url` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the endpoint or HTTP client cannot be
    /// built.
    pub fn with_base_url(
        credentials: MailgunCredentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let endpoint = messages_endpoint(base_url, credentials.domain())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifyError::Client {
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

impl Notifier for MailgunNotifier {
    fn notify(&self, assignment: &Assignment) -> Result<(), NotifyError> {
        let message = compose_message(assignment, self.credentials.domain())?;
        let santa = assignment.santa().name();
        let form = [
            ("from", message.from.as_str()),
            ("to", message.to.as_str()),
            ("subject", message.subject.as_str()),
            ("text", message.text.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth("api", Some(self.credentials.api_key()))
            .form(&form)
            .send()
            .map_err(|err| map_transport_error(santa, &err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(map_status_error(santa, status, &body))
    }
}

fn messages_endpoint(base_url: &str, domain: &str) -> Result<Url, NotifyError> {
    let base = base_url.trim_end_matches('/');
    Url::parse(&format!("{base}/v3/{domain}/messages")).map_err(|err| {
        NotifyError::InvalidEndpoint {
            message: err.to_string(),
        }
    })
}

fn map_transport_error(santa: &str, error: &reqwest::Error) -> NotifyError {
    NotifyError::Transport {
        santa: santa.to_owned(),
        message: error.to_string(),
    }
}

fn map_status_error(santa: &str, status: StatusCode, body: &str) -> NotifyError {
    let preview: String = body.trim().chars().take(BODY_PREVIEW_LIMIT).collect();
    NotifyError::Rejected {
        santa: santa.to_owned(),
        status: status.as_u16(),
        body: if preview.is_empty() {
            String::new()
        } else {
            format!(": {preview}")
        },
    }
}
