//! Uploaded image serving.
//!
//! ```text
//! GET /media/{path}   Bytes of a stored image
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Stored images never change once written.
const MEDIA_CACHE_CONTROL: &str = "public, max-age=86400";

/// Serve a stored image. Paths outside the media root are simply missing.
#[get("/media/{path:.*}")]
pub async fn serve_media(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let media = state
        .media
        .load(&path)
        .await?
        .ok_or_else(|| Error::not_found(format!("no media at {path}")))?;
    Ok(HttpResponse::Ok()
        .content_type(media.content_type)
        .insert_header((header::CACHE_CONTROL, MEDIA_CACHE_CONTROL))
        .body(media.bytes))
}
