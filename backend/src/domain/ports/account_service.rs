//! Driving port for sign-up and log-in.
use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupForm, SignupSubmission, User};

/// Result of submitting the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Registered(User),
    Invalid(SignupForm),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account from a sign-up submission.
    async fn register(&self, submission: SignupSubmission) -> Result<SignupOutcome, Error>;

    /// Check credentials. Unknown users and wrong passwords both yield
    /// [`ErrorCode::Unauthorized`](crate::domain::ErrorCode::Unauthorized).
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
