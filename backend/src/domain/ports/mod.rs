//! Domain ports for the hexagonal boundary.

mod email_mirror;
mod email_repository;
mod signup_notifier;

#[cfg(test)]
pub use email_mirror::MockEmailMirror;
pub use email_mirror::{EmailMirror, MirrorError};
#[cfg(test)]
pub use email_repository::MockEmailRepository;
pub use email_repository::{EmailRepository, EmailRepositoryError, InMemoryEmailRepository};
#[cfg(test)]
pub use signup_notifier::MockSignupNotifier;
pub use signup_notifier::{NotifierError, SignupNotifier};
