//! Static informational pages.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get};

use crate::inbound::http::auth::Viewer;
use crate::inbound::http::pages::{self, html};

#[get("/about/author/")]
pub async fn about_author(viewer: Viewer) -> HttpResponse {
    html(StatusCode::OK, pages::about_author_page(viewer.user()))
}

#[get("/about/tech/")]
pub async fn about_tech(viewer: Viewer) -> HttpResponse {
    html(StatusCode::OK, pages::about_tech_page(viewer.user()))
}
