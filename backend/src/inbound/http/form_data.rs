//! Decoding of post form bodies.
//!
//! Browsers send the create and edit forms as `multipart/form-data` because
//! of the image input. Plain `application/x-www-form-urlencoded` bodies are
//! accepted too and simply carry no image.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpMessage, HttpRequest, web};
use futures_util::{StreamExt, TryStreamExt};

use crate::domain::{Error, PostSubmission, UploadedFile};

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Largest accepted non-file field or urlencoded body.
const MAX_TEXT_BYTES: usize = 256 * 1024;

fn malformed(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed form body: {err}"))
}

fn too_large(what: &str, limit: usize) -> Error {
    Error::invalid_request(format!("{what} exceeds {limit} bytes"))
}

/// Read a post submission from either form encoding.
pub async fn read_post_submission(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<PostSubmission, Error> {
    let is_multipart = req
        .mime_type()
        .ok()
        .flatten()
        .is_some_and(|mime| mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA);
    if is_multipart {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else {
        read_urlencoded(payload).await
    }
}

async fn read_urlencoded(mut payload: web::Payload) -> Result<PostSubmission, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk =
            chunk.map_err(|err| Error::invalid_request(format!("failed to read body: {err}")))?;
        if body.len() + chunk.len() > MAX_TEXT_BYTES {
            return Err(too_large("form body", MAX_TEXT_BYTES));
        }
        body.extend_from_slice(&chunk);
    }

    let mut submission = PostSubmission::default();
    for (name, value) in url::form_urlencoded::parse(&body) {
        match name.as_ref() {
            "text" => submission.text = value.into_owned(),
            "group" => submission.group = Some(value.into_owned()),
            _ => {}
        }
    }
    Ok(submission)
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostSubmission, Error> {
    let mut submission = PostSubmission::default();
    while let Some(field) = multipart.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "image" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .unwrap_or_default()
                    .to_owned();
                let bytes = read_field(field, MAX_UPLOAD_BYTES).await?;
                submission.image = Some(UploadedFile { file_name, bytes });
            }
            "text" => submission.text = read_text_field(field).await?,
            "group" => submission.group = Some(read_text_field(field).await?),
            _ => {
                read_field(field, MAX_TEXT_BYTES).await?;
            }
        }
    }
    Ok(submission)
}

async fn read_field(mut field: Field, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large("form field", limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text_field(field: Field) -> Result<String, Error> {
    let bytes = read_field(field, MAX_TEXT_BYTES).await?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_request("form field is not UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    const BOUNDARY: &str = "quill-boundary";

    type Captured = Arc<Mutex<Option<Result<PostSubmission, ErrorCode>>>>;

    async fn decode(req: test::TestRequest) -> Result<PostSubmission, ErrorCode> {
        let captured: Captured = Arc::default();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(captured.clone()))
                .route(
                    "/",
                    web::post().to(
                        |req: HttpRequest, payload: web::Payload, captured: web::Data<Captured>| async move {
                            let result = read_post_submission(&req, payload)
                                .await
                                .map_err(|err| err.code());
                            *captured.lock().expect("capture lock") = Some(result);
                            HttpResponse::Ok()
                        },
                    ),
                ),
        )
        .await;
        test::call_service(&app, req.uri("/").to_request()).await;
        let result = captured.lock().expect("capture lock").take();
        result.expect("handler ran")
    }

    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    #[rstest]
    #[actix_web::test]
    async fn decodes_urlencoded_fields() {
        let req = test::TestRequest::post()
            .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("text=Hello+%3Cworld%3E&group=3&extra=ignored");
        let submission = decode(req).await.expect("decodes");
        assert_eq!(submission.text, "Hello <world>");
        assert_eq!(submission.group.as_deref(), Some("3"));
        assert!(submission.image.is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn decodes_multipart_with_image() {
        let gif: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        let body = multipart_body(&[
            ("text", None, "Caption".as_bytes()),
            ("group", None, b"".as_slice()),
            ("image", Some("small.gif"), gif),
        ]);
        let req = test::TestRequest::post()
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body);
        let submission = decode(req).await.expect("decodes");
        assert_eq!(submission.text, "Caption");
        assert_eq!(submission.group.as_deref(), Some(""));
        let image = submission.image.expect("image part");
        assert_eq!(image.file_name, "small.gif");
        assert_eq!(image.bytes, gif);
    }

    #[rstest]
    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let huge = vec![0_u8; MAX_UPLOAD_BYTES + 1];
        let body = multipart_body(&[("image", Some("huge.gif"), huge.as_slice())]);
        let req = test::TestRequest::post()
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body);
        assert_eq!(decode(req).await, Err(ErrorCode::InvalidRequest));
    }
}
