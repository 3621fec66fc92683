//! Image conversion service with signup-gated usage.
//!
//! Accepts an uploaded image, converts it to a requested output format,
//! and returns the converted file. Heavy usage is gated behind an
//! email-capture form; captured emails are persisted and exportable by an
//! administrator.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
