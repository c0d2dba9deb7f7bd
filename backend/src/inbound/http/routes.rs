//! Route table and URL builders for the HTML site.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::{PostId, Username};

use super::pages::{self, html};
use super::{about, accounts, follows, media, posts};

/// Register every page handler.
///
/// The health probes are registered by the server because they read
/// process state rather than [`super::state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::index)
        .service(posts::group_posts)
        .service(posts::create_form)
        .service(posts::create_post)
        .service(posts::post_detail)
        .service(posts::edit_form)
        .service(posts::edit_post)
        .service(posts::add_comment)
        .service(follows::follow_index)
        .service(follows::profile_follow)
        .service(follows::profile_unfollow)
        .service(posts::profile)
        .service(accounts::signup_form)
        .service(accounts::signup)
        .service(accounts::login_form)
        .service(accounts::login)
        .service(accounts::logout)
        .service(about::about_author)
        .service(about::about_tech)
        .service(media::serve_media);
}

/// Fallback for paths no handler claims.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    html(
        StatusCode::NOT_FOUND,
        pages::not_found_page(Some(req.path())),
    )
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

/// Path of an author's profile.
///
/// # Examples
/// ```
/// use quill::domain::Username;
/// use quill::inbound::http::routes::profile_path;
///
/// let name = Username::new("ann@home").expect("valid username");
/// assert_eq!(profile_path(&name), "/profile/ann%40home/");
/// ```
pub fn profile_path(username: &Username) -> String {
    format!("/profile/{}/", encode_segment(username.as_str()))
}

/// Path of a post's detail page.
pub fn post_path(id: PostId) -> String {
    format!("/posts/{id}/")
}
