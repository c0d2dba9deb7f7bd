//! Request extractors identifying who is calling.
//!
//! [`Viewer`] reads the session and never fails for anonymous clients.
//! [`SignedIn`] gates a handler: anonymous clients are redirected to the
//! log-in page with the requested path in `next`.

use actix_web::error::InternalError;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::User;

use super::session::SessionContext;

/// Path of the log-in page.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Log-in URL that returns to `next` afterwards.
///
/// # Examples
/// ```
/// use quill::inbound::http::auth::login_url;
///
/// assert_eq!(login_url("/create/"), "/auth/login/?next=%2Fcreate%2F");
/// ```
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_PATH}?next={encoded}")
}

/// Whether `next` is safe to redirect to after logging in: a local,
/// absolute path that cannot be read as a scheme-relative URL.
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

/// A `302 Found` redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// Whoever is making the request, if anyone is signed in.
pub struct Viewer(pub Option<User>);

impl Viewer {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            Ok(Self(session.current_user()?))
        })
    }
}

/// A signed-in user. Extraction fails with a redirect to the log-in page.
pub struct SignedIn(pub User);

impl FromRequest for SignedIn {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let next = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
        Box::pin(async move {
            let session = session.await?;
            match session.current_user()? {
                Some(user) => Ok(Self(user)),
                None => Err(InternalError::from_response(
                    "login required",
                    redirect(&login_url(&next)),
                )
                .into()),
            }
        })
    }
}
