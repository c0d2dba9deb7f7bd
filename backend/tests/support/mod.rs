//! Helpers shared by the HTTP integration suites.

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};

use quill::inbound::http::session::SESSION_COOKIE_NAME;
pub use quill::test_support::PIXEL_GIF;
use quill::test_support::TEST_PASSWORD;


const BOUNDARY: &str = "quill-test-boundary";

/// Log-in form submission for `username` with the fixture password.
pub fn login_request(username: &str) -> TestRequest {
    TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", username), ("password", TEST_PASSWORD)])
}

/// Session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("response should set the session cookie")
}

/// Target of a redirect response.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

pub async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// Number of post cards on a listing page.
pub fn post_cards(html: &str) -> usize {
    html.matches(r#"<article class="post" "#).count()
}

/// A `multipart/form-data` post form. `image` is `(file name, bytes)`.
pub fn post_form(
    uri: &str,
    text: &str,
    group: Option<&str>,
    image: Option<(&str, &[u8])>,
) -> TestRequest {
    let mut body = Vec::new();
    let mut text_part = |name: &str, value: &str| {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };
    text_part("text", text);
    text_part("group", group.unwrap_or_default());
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}
