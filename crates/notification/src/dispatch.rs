use crate::{Email, Outbox};

/// Unique addresses in first-seen order, primary recipient first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// `additional` is a comma separated list. Blank entries are dropped.
    pub fn new(primary: &str, additional: &str) -> Self {
        Self::from_iter(std::iter::once(primary).chain(additional.split(',')))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The primary recipient alone in test mode, everyone otherwise.
    pub fn targets(&self, test_run: bool) -> &[String] {
        if test_run {
            &self.0[..self.0.len().min(1)]
        } else {
            &self.0
        }
    }
}

impl<'a> FromIterator<&'a str> for Recipients {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut emails: Vec<String> = Vec::new();

        for email in iter.into_iter().map(str::trim) {
            if !email.is_empty() && !emails.iter().any(|seen| seen == email) {
                emails.push(email.to_owned());
            }
        }

        Self(emails)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: String,
    pub error: Option<String>,
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub deliveries: Vec<Delivery>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.deliveries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.deliveries.iter().filter(|d| d.is_sent()).count()
    }

    /// At least one recipient got the message.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }

    pub fn is_partial(&self) -> bool {
        self.is_success() && self.succeeded() < self.attempted()
    }
}

/// Sends `email` to each target in order. A failed recipient doesn't stop
/// the others.
pub async fn dispatch<O: Outbox + ?Sized>(
    outbox: &O,
    email: &Email,
    recipients: &Recipients,
    test_run: bool,
) -> DispatchReport {
    let targets = recipients.targets(test_run);

    if test_run {
        tracing::info!("test run, sending only to primary recipient");
    } else {
        tracing::info!(recipients = targets.len(), "sending to all recipients");
    }

    if targets.is_empty() {
        tracing::error!("no recipients specified");
    }

    let mut report = DispatchReport::default();

    for recipient in targets {
        let error = match outbox.deliver(recipient, email).await {
            Ok(()) => {
                tracing::info!(to = %recipient, "email sent");
                None
            }
            Err(err) => {
                tracing::error!(to = %recipient, err = %err, "failed to send email");
                Some(err.to_string())
            }
        };

        report.deliveries.push(Delivery {
            recipient: recipient.clone(),
            error,
        });
    }

    report
}
