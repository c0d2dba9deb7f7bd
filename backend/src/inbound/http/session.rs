//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as signing a user in or reading who is
//! signed in.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, User, UserId, Username};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Sign `user` in. The session id is renewed first.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id().to_string())
            .and_then(|()| self.0.insert(USERNAME_KEY, user.username().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in user, if the session names a well-formed one.
    pub fn current_user(&self) -> Result<Option<User>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_username)) = (read(USER_ID_KEY)?, read(USERNAME_KEY)?) else {
            return Ok(None);
        };
        match (UserId::new(raw_id), Username::new(raw_username)) {
            (Ok(id), Ok(username)) => Ok(Some(User::new(id, username))),
            (Err(error), _) | (_, Err(error)) => {
                warn!("invalid user in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Sign out and drop every session value.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
