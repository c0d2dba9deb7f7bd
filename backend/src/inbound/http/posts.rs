//! Post listing, detail and authoring handlers.
//!
//! ```text
//! GET  /                       Index (cached)
//! GET  /group/{slug}/          Group listing
//! GET  /profile/{username}/    Author profile
//! GET  /posts/{id}/            Post detail with comments
//! GET  /create/                New post form
//! POST /create/                Publish a post
//! GET  /posts/{id}/edit/       Edit form (author only)
//! POST /posts/{id}/edit/       Apply an edit (author only)
//! POST /posts/{id}/comment/    Add a comment
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AddCommentOutcome, CachedPage, CreatePostOutcome, EditFormOutcome, EditPostOutcome,
    PageCacheKey,
};
use crate::domain::{Error, PostForm, PostId, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{SignedIn, Viewer, redirect};
use crate::inbound::http::form_data::read_post_submission;
use crate::inbound::http::pages::{self, HTML_CONTENT_TYPE, html};
use crate::inbound::http::routes::{post_path, profile_path};
use crate::inbound::http::state::HttpState;
use pagination::PageRequest;

/// `?page=` query parameter of paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// The requested page. Anything that is not a positive number is page 1.
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref())
    }
}

/// Body of the comment form.
#[derive(Debug, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    text: String,
}

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::parse(raw).ok_or_else(|| Error::not_found(format!("no post with id {raw}")))
}

fn cached_response(page: CachedPage) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(page.content_type)
        .body(page.body)
}

/// Index of every post, newest first.
///
/// The rendered page is cached whole under a single key, so every page
/// number and every viewer is served the same body until it expires.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    viewer: Viewer,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let key = PageCacheKey::index_page();
    match state.page_cache.get(&key).await {
        Ok(Some(page)) => {
            debug!(%key, "serving cached index");
            return Ok(cached_response(page));
        }
        Ok(None) => {}
        Err(error) => warn!(%error, %key, "page cache read failed; rendering fresh"),
    }

    let posts = state.posts.index(query.request()).await?;
    let page = CachedPage {
        content_type: HTML_CONTENT_TYPE.to_owned(),
        body: pages::index_page(&posts, viewer.user()),
    };
    if let Err(error) = state
        .page_cache
        .put(&key, page.clone(), state.index_ttl)
        .await
    {
        warn!(%error, %key, "page cache write failed");
    }
    Ok(cached_response(page))
}

/// Posts filed under one group.
#[get("/group/{slug}/")]
pub async fn group_posts(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let listing = state.posts.group_posts(&path, query.request()).await?;
    Ok(html(
        StatusCode::OK,
        pages::group_page(&listing, viewer.user()),
    ))
}

/// An author's posts and whether the viewer follows them.
#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer_id = viewer.user().map(|user| *user.id());
    let listing = state
        .posts
        .profile(&path, viewer_id, query.request())
        .await?;
    Ok(html(
        StatusCode::OK,
        pages::profile_page(&listing, viewer.user()),
    ))
}

/// One post with its comments.
#[get("/posts/{id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let detail = state.posts.post_detail(id).await?;
    Ok(html(
        StatusCode::OK,
        pages::post_detail_page(&detail, viewer.user()),
    ))
}

async fn render_post_form(
    state: &HttpState,
    form: &PostForm,
    editing: Option<PostId>,
    user: &User,
) -> ApiResult<HttpResponse> {
    let groups = state.posts.groups().await?;
    Ok(html(
        StatusCode::OK,
        pages::post_form_page(form, &groups, editing, user),
    ))
}

/// Blank form for a new post.
#[get("/create/")]
pub async fn create_form(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
) -> ApiResult<HttpResponse> {
    render_post_form(&state, &PostForm::blank(), None, &user).await
}

/// Publish a post and go to the author's profile.
#[post("/create/")]
pub async fn create_post(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let submission = read_post_submission(&req, payload).await?;
    match state.post_commands.create_post(*user.id(), submission).await? {
        CreatePostOutcome::Created(post) => {
            info!(post_id = %post.id(), author = %user, "post created");
            Ok(redirect(&profile_path(post.author().username())))
        }
        CreatePostOutcome::Invalid(form) => render_post_form(&state, &form, None, &user).await,
    }
}

/// Prefilled edit form. Anyone but the author is sent back to the post.
#[get("/posts/{id}/edit/")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    match state.post_commands.edit_form(*user.id(), id).await? {
        EditFormOutcome::Editable(form) => render_post_form(&state, &form, Some(id), &user).await,
        EditFormOutcome::NotAuthor => Ok(redirect(&post_path(id))),
    }
}

/// Apply an edit. A non-author's submission changes nothing.
#[post("/posts/{id}/edit/")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    path: web::Path<String>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let submission = read_post_submission(&req, payload).await?;
    match state.post_commands.edit_post(*user.id(), id, submission).await? {
        EditPostOutcome::Updated(_) => {
            info!(post_id = %id, editor = %user, "post updated");
            Ok(redirect(&post_path(id)))
        }
        EditPostOutcome::NotAuthor => {
            debug!(post_id = %id, editor = %user, "edit by non-author ignored");
            Ok(redirect(&post_path(id)))
        }
        EditPostOutcome::Invalid(form) => render_post_form(&state, &form, Some(id), &user).await,
    }
}

/// Comment on a post. Blank comments and bodies that are not a readable
/// comment form are dropped; either way the client lands back on the post.
#[post("/posts/{id}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    SignedIn(user): SignedIn,
    path: web::Path<String>,
    form: Option<web::Form<CommentFormData>>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let text = match &form {
        Some(form) => form.text.as_str(),
        None => {
            debug!(post_id = %id, "unreadable comment body treated as blank");
            ""
        }
    };
    match state
        .post_commands
        .add_comment(*user.id(), id, text)
        .await?
    {
        AddCommentOutcome::Added(comment) => {
            info!(post_id = %id, comment_id = ?comment.id(), author = %user, "comment added");
        }
        AddCommentOutcome::Discarded => debug!(post_id = %id, "blank comment discarded"),
    }
    Ok(redirect(&post_path(id)))
}
