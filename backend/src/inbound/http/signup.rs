//! Signup handlers for `GET /signup` and `POST /signup`.

use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::domain::Error;
use crate::inbound::http::{client_addr, pages, ApiResult, HttpState};

/// Urlencoded payload for `POST /signup`.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
}

/// Render the email-capture form.
#[get("/signup")]
pub async fn signup_form() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::signup().into_string())
}

/// Record a submitted email and send the client back to the converter.
///
/// Only non-emptiness is enforced; the address syntax is not validated.
#[post("/signup")]
pub async fn submit_signup(
    req: HttpRequest,
    state: web::Data<HttpState>,
    form: web::Form<SignupForm>,
) -> ApiResult<HttpResponse> {
    let email = form.email.trim();
    if email.is_empty() {
        return Err(Error::invalid_request("email must not be empty"));
    }

    state
        .signup
        .register_email(email, &client_addr(&req))
        .await?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish())
}
