//! HTTP inbound adapter.

pub mod admin;
pub mod convert;
pub mod error;
pub mod health;
pub mod pages;
pub mod signup;
pub mod state;

pub use error::ApiResult;
pub use state::{AdminToken, HttpState};

use actix_web::HttpRequest;

/// The client address used as the rate-limiting key.
///
/// Peer socket IP, without the port. Requests arriving without a peer
/// address (only possible through test harnesses) share the "unknown" key.
#[must_use]
pub fn client_addr(req: &HttpRequest) -> String {
    req.peer_addr()
        .map_or_else(|| "unknown".to_owned(), |addr| addr.ip().to_string())
}
