//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match the embedded migrations exactly.

diesel::table! {
    /// Captured signup emails.
    ///
    /// `timestamp` is stored as RFC 3339 text, matching what the signup
    /// service produces; ordering for exports uses the serial `id`.
    emails (id) {
        id -> Int4,
        timestamp -> Text,
        ip -> Text,
        email -> Text,
    }
}
