//! Captured signup records.

/// A persisted signup row.
///
/// `timestamp` is an RFC 3339 string, `ip` the submitting client address.
/// The email value is stored as submitted; duplicates are permitted and
/// rows are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    pub id: i32,
    pub timestamp: String,
    pub ip: String,
    pub email: String,
}

/// A signup row about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailRecord {
    pub timestamp: String,
    pub ip: String,
    pub email: String,
}
