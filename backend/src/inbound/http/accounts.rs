//! Account handlers.
//!
//! ```text
//! GET  /auth/signup/   Sign-up form
//! POST /auth/signup/   Create an account and sign in
//! GET  /auth/login/    Log-in form (?next=/path/)
//! POST /auth/login/    Check credentials and sign in
//! GET  /auth/logout/   Sign out
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::SignupOutcome;
use crate::domain::{
    ErrorCode, FieldErrors, LoginCredentials, LoginForm, NON_FIELD_ERRORS, SignupForm,
    SignupSubmission,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{is_local_path, redirect};
use crate::inbound::http::pages::{self, html};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Shown for unknown usernames, wrong passwords and blank fields alike.
pub const INVALID_LOGIN_MESSAGE: &str = "Please enter a correct username and password.";

/// Body of the sign-up form.
#[derive(Deserialize)]
pub struct SignupFormData {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password1: String,
    #[serde(default)]
    password2: String,
}

impl From<SignupFormData> for SignupSubmission {
    fn from(value: SignupFormData) -> Self {
        Self {
            username: value.username,
            password1: Zeroizing::new(value.password1),
            password2: Zeroizing::new(value.password2),
        }
    }
}

/// `?next=` on the log-in page.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

/// Body of the log-in form.
#[derive(Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

fn local_next(next: Option<String>) -> Option<String> {
    next.filter(|next| is_local_path(next))
}

/// Empty sign-up form.
#[get("/auth/signup/")]
pub async fn signup_form() -> HttpResponse {
    html(StatusCode::OK, pages::signup_page(&SignupForm::blank()))
}

/// Create an account, sign it in and go to the index.
#[post("/auth/signup/")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<SignupFormData>,
) -> ApiResult<HttpResponse> {
    match state.accounts.register(form.into_inner().into()).await? {
        SignupOutcome::Registered(user) => {
            session.persist_user(&user)?;
            info!(user = %user, "account registered");
            Ok(redirect("/"))
        }
        SignupOutcome::Invalid(form) => Ok(html(StatusCode::OK, pages::signup_page(&form))),
    }
}

/// Empty log-in form carrying `next` when it is a local path.
#[get("/auth/login/")]
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    let form = LoginForm {
        next: local_next(query.into_inner().next),
        ..LoginForm::default()
    };
    html(StatusCode::OK, pages::login_page(&form))
}

/// Sign in and follow `next`, or redisplay the form with an error.
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginFormData>,
) -> ApiResult<HttpResponse> {
    let LoginFormData {
        username,
        password,
        next,
    } = form.into_inner();
    let password = Zeroizing::new(password);
    let next = local_next(next);

    let authenticated = match LoginCredentials::try_from_parts(&username, &password) {
        Ok(credentials) => match state.accounts.authenticate(&credentials).await {
            Ok(user) => Some(user),
            Err(error) if error.code() == ErrorCode::Unauthorized => None,
            Err(error) => return Err(error),
        },
        Err(_) => None,
    };

    match authenticated {
        Some(user) => {
            session.persist_user(&user)?;
            info!(user = %user, "signed in");
            Ok(redirect(next.as_deref().unwrap_or("/")))
        }
        None => {
            warn!(username = %username.trim(), "failed log-in attempt");
            let mut errors = FieldErrors::new();
            errors.add(NON_FIELD_ERRORS, INVALID_LOGIN_MESSAGE);
            let form = LoginForm {
                username,
                next,
                errors,
            };
            Ok(html(StatusCode::OK, pages::login_page(&form)))
        }
    }
}

/// Sign out.
#[get("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    html(StatusCode::OK, pages::logged_out_page())
}
