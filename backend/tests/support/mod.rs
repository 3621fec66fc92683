//! Shared helpers for HTTP integration tests.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use tempfile::TempDir;

use backend::domain::ports::{EmailRepository, InMemoryEmailRepository};
use backend::domain::{ConversionService, SignupService, UsageGate};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::{AdminToken, HttpState};

/// Admin secret used by the test state.
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Handler state over in-memory fixtures. The returned `TempDir` owns the
/// artifact directory and must outlive the test.
pub fn test_state(repository: Arc<InMemoryEmailRepository>) -> (web::Data<HttpState>, TempDir) {
    let artifact_dir = TempDir::new().expect("artifact dir");
    let gate = Arc::new(UsageGate::new(64));
    let converter = Arc::new(
        ConversionService::new(artifact_dir.path(), Duration::from_secs(3600))
            .expect("conversion service"),
    );
    let repository: Arc<dyn EmailRepository> = repository;
    let signup = Arc::new(SignupService::new(repository.clone(), gate.clone()));

    let state = HttpState {
        gate,
        converter,
        signup,
        emails: repository,
        admin_token: AdminToken::new(ADMIN_TOKEN),
    };
    (web::Data::new(state), artifact_dir)
}

/// Fresh health state already marked ready.
pub fn ready_health_state() -> web::Data<HealthState> {
    let state = web::Data::new(HealthState::new());
    state.mark_ready();
    state
}

/// A decodable 1x1 opaque RGB PNG.
pub fn png_bytes() -> Vec<u8> {
    let pixel: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(1, 1, Rgb([12, 140, 250]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixel)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode fixture");
    buf.into_inner()
}

const BOUNDARY: &str = "----integration-test-boundary";

/// Content type for payloads built by [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a `POST /` payload with a `file` part and an optional `format`
/// part.
pub fn multipart_body(file: &[u8], format: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"input.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(file);
    body.extend_from_slice(b"\r\n");
    if let Some(format) = format {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"format\"\r\n\r\n");
        body.extend_from_slice(format.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
