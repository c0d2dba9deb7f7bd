//! Follow feed and follow toggles.
//!
//! ```text
//! GET /follow/                       Posts by followed authors
//! GET /profile/{username}/follow/    Follow an author
//! GET /profile/{username}/unfollow/  Stop following an author
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, web};
use tracing::info;

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{SignedIn, redirect};
use crate::inbound::http::pages::{self, html};
use crate::inbound::http::posts::PageQuery;
use crate::inbound::http::routes::profile_path;
use crate::inbound::http::state::HttpState;

/// Posts written by authors the viewer follows.
#[get("/follow/")]
pub async fn follow_index(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = state.posts.follow_feed(*user.id(), query.request()).await?;
    Ok(html(StatusCode::OK, pages::follow_page(&page, &user)))
}

/// Follow `username` and return to their profile. Repeats and attempts to
/// follow oneself change nothing.
#[get("/profile/{username}/follow/")]
pub async fn profile_follow(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let (author, outcome) = state.follows.follow(*user.id(), &path).await?;
    info!(follower = %user, author = %author, ?outcome, "follow requested");
    Ok(redirect(&profile_path(author.username())))
}

/// Stop following `username` and return to their profile.
#[get("/profile/{username}/unfollow/")]
pub async fn profile_unfollow(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let (author, outcome) = state.follows.unfollow(*user.id(), &path).await?;
    info!(follower = %user, author = %author, ?outcome, "unfollow requested");
    Ok(redirect(&profile_path(author.username())))
}
