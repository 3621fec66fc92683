//! Outbound adapters.

pub mod mailer;
pub mod mirror;
pub mod persistence;
