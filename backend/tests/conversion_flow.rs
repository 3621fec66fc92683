//! End-to-end conversion and gating scenarios over in-memory fixtures.

mod support;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;

use backend::domain::ports::InMemoryEmailRepository;
use backend::server::build_app;

use support::{
    multipart_body, multipart_content_type, png_bytes, ready_health_state, test_state,
};

fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([10, 1, 1, last_octet], 40000))
}

fn convert_request(peer_addr: SocketAddr, format: Option<&str>) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/")
        .peer_addr(peer_addr)
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&png_bytes(), format))
        .to_request()
}

#[actix_rt::test]
async fn first_four_attempts_download_then_the_fifth_redirects_to_signup() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    // GET requests are not counted by the gate.
    for _ in 0..4 {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/")
                .peer_addr(peer(1))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    for attempt in 1..=4 {
        let response = actix_test::call_service(&app, convert_request(peer(1), Some("png"))).await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "attempt {attempt} should download"
        );
        let disposition = response
            .headers()
            .get("content-disposition")
            .expect("attachment header");
        assert!(disposition.to_str().expect("ascii").starts_with("attachment"));
    }

    let response = actix_test::call_service(&app, convert_request(peer(1), Some("png"))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get("location")
            .expect("redirect target")
            .to_str()
            .expect("ascii"),
        "/signup"
    );
}

#[actix_rt::test]
async fn signup_unlocks_conversions_until_the_daily_limit() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    // Burn the free attempts; the 5th redirects.
    for _ in 0..5 {
        actix_test::call_service(&app, convert_request(peer(2), Some("jpg"))).await;
    }

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .peer_addr(peer(2))
            .set_form([("email", "a@b.com")])
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get("location")
            .expect("redirect target")
            .to_str()
            .expect("ascii"),
        "/"
    );

    // Attempts 6 through 20 succeed after signup.
    for attempt in 6..=20 {
        let response = actix_test::call_service(&app, convert_request(peer(2), Some("jpg"))).await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "attempt {attempt} should download"
        );
    }

    // The 21st is denied with the limit message.
    let response = actix_test::call_service(&app, convert_request(peer(2), Some("jpg"))).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = actix_test::read_body(response).await;
    assert_eq!(body, "Daily limit reached. Try again tomorrow.".as_bytes());
}

#[actix_rt::test]
async fn addresses_do_not_share_quotas() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    for _ in 0..5 {
        actix_test::call_service(&app, convert_request(peer(3), Some("png"))).await;
    }
    let response = actix_test::call_service(&app, convert_request(peer(4), Some("png"))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn omitted_format_defaults_to_jpeg() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    let response = actix_test::call_service(&app, convert_request(peer(5), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .expect("attachment header")
        .to_str()
        .expect("ascii")
        .to_owned();
    assert!(disposition.contains(".jpg"), "got {disposition}");
}

#[actix_rt::test]
async fn unsupported_format_is_rejected_echoing_the_token() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    let response = actix_test::call_service(&app, convert_request(peer(6), Some("bogus"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = actix_test::read_body(response).await;
    assert_eq!(body, "Unsupported format: bogus".as_bytes());
}

#[actix_rt::test]
async fn undecodable_uploads_fail_with_a_decode_error() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    let request = actix_test::TestRequest::post()
        .uri("/")
        .peer_addr(peer(7))
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(b"not an image at all", Some("png")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = actix_test::read_body(response).await;
    assert!(
        String::from_utf8_lossy(&body).contains("could not decode uploaded image"),
        "unexpected body"
    );
}

#[actix_rt::test]
async fn empty_signup_email_is_rejected() {
    let (state, _artifacts) = test_state(Arc::new(InMemoryEmailRepository::new()));
    let app = actix_test::init_service(build_app(state, ready_health_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .peer_addr(peer(8))
            .set_form([("email", "   ")])
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
