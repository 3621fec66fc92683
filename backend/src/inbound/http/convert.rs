//! Upload and conversion handlers for `GET /` and `POST /`.

use actix_files::NamedFile;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::http::header::{self, ContentDisposition};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Local;

use crate::domain::{Decision, Error, OutputFormat};
use crate::inbound::http::{client_addr, pages, ApiResult, HttpState};

/// Multipart payload for `POST /`: the image bytes and an optional format
/// token (default `jpg`).
#[derive(Debug, MultipartForm)]
pub struct ConvertForm {
    #[multipart(limit = "25MB")]
    pub file: Option<TempFile>,
    pub format: Option<Text<String>>,
}

/// Render the upload form.
#[get("/")]
pub async fn upload_form() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::index().into_string())
}

/// Convert an uploaded image.
///
/// Pipeline: usage gate, then format resolution, then conversion. The gate
/// counts every POST, including ones that end up redirected or rejected.
/// Successful conversions stream back as an attachment download.
#[post("/")]
pub async fn convert(
    req: HttpRequest,
    state: web::Data<HttpState>,
    form: MultipartForm<ConvertForm>,
) -> ApiResult<HttpResponse> {
    let addr = client_addr(&req);
    match state.gate.register_attempt(&addr, Local::now().date_naive()) {
        Decision::RequireSignup => {
            return Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, "/signup"))
                .finish());
        }
        Decision::DenyDailyLimit => return Err(Error::daily_limit_exceeded()),
        Decision::Allow => {}
    }

    let form = form.into_inner();
    let format = OutputFormat::resolve(form.format.as_ref().map(|token| token.0.as_str()))?;
    let upload = form
        .file
        .ok_or_else(|| Error::invalid_request("no file uploaded"))?;

    let converter = state.converter.clone();
    let artifact = web::block(move || {
        let bytes = std::fs::read(upload.file.path())
            .map_err(|err| Error::internal(format!("could not read upload: {err}")))?;
        converter.convert(&bytes, format).map_err(Error::from)
    })
    .await
    .map_err(|err| Error::internal(err.to_string()))??;

    let download = NamedFile::open_async(&artifact.path)
        .await
        .map_err(|err| Error::internal(format!("could not open artifact: {err}")))?
        .set_content_disposition(ContentDisposition::attachment(artifact.file_name));
    Ok(download.into_response(&req))
}
