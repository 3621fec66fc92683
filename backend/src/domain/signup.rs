//! Signup service.
//!
//! Records a submitted email address, flips the usage gate's
//! `email_provided` flag for the submitting address, and then performs the
//! best-effort extras: operator notification and flat-mirror rewrite.
//! Failures of the extras are logged and swallowed; only the storage
//! insert can fail the signup.

use std::sync::Arc;

use chrono::{Local, SecondsFormat};
use tracing::warn;

use super::email::NewEmailRecord;
use super::error::Error;
use super::ports::{EmailMirror, EmailRepository, SignupNotifier};
use super::usage_gate::UsageGate;

/// Handles `POST /signup` submissions.
pub struct SignupService {
    repository: Arc<dyn EmailRepository>,
    gate: Arc<UsageGate>,
    notifier: Option<Arc<dyn SignupNotifier>>,
    mirror: Option<Arc<dyn EmailMirror>>,
}

impl SignupService {
    pub fn new(repository: Arc<dyn EmailRepository>, gate: Arc<UsageGate>) -> Self {
        Self {
            repository,
            gate,
            notifier: None,
            mirror: None,
        }
    }

    /// Attach a best-effort operator notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn SignupNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Attach a best-effort flat-file mirror.
    #[must_use]
    pub fn with_mirror(mut self, mirror: Arc<dyn EmailMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Persist `(now, addr, email)` and mark the gate entry for `addr`.
    ///
    /// The email value is stored as submitted; no syntax validation happens
    /// here. This is the only operation that can move a gate entry from
    /// `email_provided = false` to `true` within a calendar day.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the insert fails. Notifier and
    /// mirror failures are swallowed.
    pub async fn register_email(&self, email: &str, addr: &str) -> Result<(), Error> {
        let now = Local::now();
        let record = NewEmailRecord {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
            ip: addr.to_owned(),
            email: email.to_owned(),
        };

        self.repository.insert(&record).await?;
        self.gate.mark_email_provided(addr, now.date_naive());

        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier.notify(&record).await {
                warn!(error = %err, "signup notification failed");
            }
        }

        if let Some(mirror) = &self.mirror {
            match self.repository.list_recent_first().await {
                Ok(records) => {
                    if let Err(err) = mirror.rewrite(&records).await {
                        warn!(error = %err, "mirror rewrite failed");
                    }
                }
                Err(err) => warn!(error = %err, "mirror skipped: could not list records"),
            }
        }

        Ok(())
    }
}
