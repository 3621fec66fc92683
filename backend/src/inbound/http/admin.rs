//! Admin export endpoints.
//!
//! Both endpoints require the `admin` query parameter to match the
//! configured shared secret; otherwise they return 403 without leaking any
//! record data. `/emails` renders an HTML table, `/emails.csv` a CSV
//! attachment. Records come back newest first.

use actix_web::http::header::{self, ContentDisposition};
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::domain::{EmailRecord, Error};
use crate::inbound::http::{pages, ApiResult, HttpState};

/// Query string carrying the shared secret.
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub admin: Option<String>,
}

fn authorize(state: &HttpState, query: &AdminQuery) -> Result<(), Error> {
    match query.admin.as_deref() {
        Some(candidate) if state.admin_token.verify(candidate) => Ok(()),
        _ => Err(Error::unauthorized()),
    }
}

/// Render all captured records as CSV with a `timestamp,ip,email` header.
/// Fields are quoted and escaped by the writer; embedded commas or quotes
/// in an email value cannot corrupt a row.
pub fn render_csv(records: &[EmailRecord]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["timestamp", "ip", "email"])
        .map_err(|err| Error::internal(format!("csv header: {err}")))?;
    for record in records {
        writer
            .write_record([&record.timestamp, &record.ip, &record.email])
            .map_err(|err| Error::internal(format!("csv row: {err}")))?;
    }
    writer
        .into_inner()
        .map_err(|err| Error::internal(format!("csv flush: {err}")))
}

/// HTML table of all captured records.
#[get("/emails")]
pub async fn list_emails(
    state: web::Data<HttpState>,
    query: web::Query<AdminQuery>,
) -> ApiResult<HttpResponse> {
    authorize(&state, &query)?;
    let records = state.emails.list_recent_first().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::emails(&records).into_string()))
}

/// CSV attachment of all captured records.
#[get("/emails.csv")]
pub async fn export_emails(
    state: web::Data<HttpState>,
    query: web::Query<AdminQuery>,
) -> ApiResult<HttpResponse> {
    authorize(&state, &query)?;
    let records = state.emails.list_recent_first().await?;
    let body = render_csv(&records)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            ContentDisposition::attachment("emails.csv"),
        ))
        .body(body))
}
