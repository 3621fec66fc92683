//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use diesel::prelude::*;

use super::schema::emails;

/// Row struct for reading from the emails table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = emails)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmailRow {
    pub id: i32,
    pub timestamp: String,
    pub ip: String,
    pub email: String,
}

/// Insertable struct for appending signup records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = emails)]
pub(crate) struct NewEmailRow<'a> {
    pub timestamp: &'a str,
    pub ip: &'a str,
    pub email: &'a str,
}
