//! SMTP signup notifier.
//!
//! Sends a short notice to the operator mailbox when a signup lands.
//! Callers treat delivery as best effort; errors surface only as warnings.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::{NotifierError, SignupNotifier};
use crate::domain::NewEmailRecord;

/// Lettre-backed implementation of the `SignupNotifier` port.
pub struct SmtpSignupNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpSignupNotifier {
    /// Build a notifier relaying through `relay` with the given
    /// credentials. The operator address doubles as the sender.
    ///
    /// # Errors
    ///
    /// Fails when the relay host is invalid or an address does not parse.
    pub fn new(
        relay: &str,
        username: &str,
        password: &str,
        to: &str,
    ) -> Result<Self, NotifierError> {
        let from: Mailbox = username
            .parse()
            .map_err(|err| NotifierError::send(format!("invalid sender address: {err}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|err| NotifierError::send(format!("invalid operator address: {err}")))?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)
            .map_err(|err| NotifierError::send(format!("invalid relay: {err}")))?
            .credentials(Credentials::new(username.to_owned(), password.to_owned()))
            .build();
        Ok(Self { mailer, from, to })
    }
}

#[async_trait]
impl SignupNotifier for SmtpSignupNotifier {
    async fn notify(&self, record: &NewEmailRecord) -> Result<(), NotifierError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject("New signup captured")
            .body(format!(
                "{} signed up from {} at {}",
                record.email, record.ip, record.timestamp
            ))
            .map_err(|err| NotifierError::send(format!("could not compose message: {err}")))?;

        self.mailer
            .send(message)
            .await
            .map_err(|err| NotifierError::send(err.to_string()))?;
        Ok(())
    }
}
