//! Sign-up and log-in use-cases backed by the user repository and a
//! password hasher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountService, PasswordHasher, SignupOutcome, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, LoginCredentials, SignupForm, SignupSubmission, User, Username};

/// Message shown when a sign-up picks a username that is already taken.
pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";

/// Domain service implementing [`AccountService`].
#[derive(Clone)]
pub struct PasswordAccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl PasswordAccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl AccountService for PasswordAccountService {
    async fn register(&self, submission: SignupSubmission) -> Result<SignupOutcome, Error> {
        let registration = match submission.validate() {
            Ok(registration) => registration,
            Err(form) => return Ok(SignupOutcome::Invalid(form)),
        };
        let duplicate = || {
            SignupOutcome::Invalid(SignupForm::with_error(
                registration.username().as_str(),
                "username",
                DUPLICATE_USERNAME_MESSAGE,
            ))
        };
        if self
            .users
            .find_by_username(registration.username())
            .await?
            .is_some()
        {
            return Ok(duplicate());
        }

        let hash = self.hasher.hash(registration.password())?;
        match self.users.create(registration.username(), &hash).await {
            Ok(user) => {
                info!(user_id = %user.id(), username = %user.username(), "account registered");
                Ok(SignupOutcome::Registered(user))
            }
            // Lost a race with a concurrent sign-up for the same name.
            Err(UserRepositoryError::Duplicate { .. }) => Ok(duplicate()),
            Err(err) => Err(err.into()),
        }
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let rejected = || Error::unauthorized("invalid credentials");
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(rejected());
        };
        let Some(account) = self.users.find_account(&username).await? else {
            warn!(%username, "login for unknown user");
            return Err(rejected());
        };
        if !self
            .hasher
            .verify(credentials.password(), &account.password_hash)?
        {
            warn!(%username, "login with wrong password");
            return Err(rejected());
        }
        Ok(account.user)
    }
}

#[cfg(test)]
mod tests {
    //! Registration and credential checks.
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
    use crate::domain::{ErrorCode, StoredAccount, UserId};
    use rstest::rstest;
    use zeroize::Zeroizing;

    fn signup(username: &str, password: &str) -> SignupSubmission {
        SignupSubmission {
            username: username.to_owned(),
            password1: Zeroizing::new(password.to_owned()),
            password2: Zeroizing::new(password.to_owned()),
        }
    }

    fn leo() -> User {
        User::new(UserId::random(), Username::new("leo").expect("username"))
    }

    fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> PasswordAccountService {
        PasswordAccountService::new(Arc::new(users), Arc::new(hasher))
    }

    #[rstest]
    #[tokio::test]
    async fn register_hashes_password_and_creates_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));
        users
            .expect_create()
            .withf(|username, hash| username.as_str() == "leo" && hash == "hashed")
            .times(1)
            .return_once(|_, _| Ok(leo()));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password == "war-and-peace")
            .return_once(|_| Ok("hashed".to_owned()));

        let outcome = service(users, hasher)
            .register(signup("leo", "war-and-peace"))
            .await
            .expect("register");
        assert!(matches!(outcome, SignupOutcome::Registered(user) if user.username().as_str() == "leo"));
    }

    #[rstest]
    #[case::taken_before_insert(true)]
    #[case::taken_during_insert(false)]
    #[tokio::test]
    async fn duplicate_username_redisplays_form(#[case] seen_on_lookup: bool) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(seen_on_lookup.then(leo)));
        users
            .expect_create()
            .returning(|_, _| Err(UserRepositoryError::duplicate("leo")));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Ok("hashed".to_owned()));

        let outcome = service(users, hasher)
            .register(signup("leo", "war-and-peace"))
            .await
            .expect("register");
        let SignupOutcome::Invalid(form) = outcome else {
            panic!("expected invalid form");
        };
        assert_eq!(
            form.errors.field("username"),
            &[DUPLICATE_USERNAME_MESSAGE.to_owned()]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_signup_touches_nothing() {
        let mut users = MockUserRepository::new();
        users.expect_create().never();
        let outcome = service(users, MockPasswordHasher::new())
            .register(signup("leo", "short"))
            .await
            .expect("register");
        assert!(matches!(outcome, SignupOutcome::Invalid(_)));
    }

    #[rstest]
    #[case::matching(true)]
    #[case::wrong_password(false)]
    #[tokio::test]
    async fn authenticate_checks_hash(#[case] matches: bool) {
        let user = leo();
        let account = StoredAccount {
            user: user.clone(),
            password_hash: "stored".to_owned(),
        };
        let mut users = MockUserRepository::new();
        users
            .expect_find_account()
            .return_once(move |_| Ok(Some(account)));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, hash| password == "war-and-peace" && hash == "stored")
            .return_once(move |_, _| Ok(matches));

        let credentials =
            LoginCredentials::try_from_parts("leo", "war-and-peace").expect("credentials");
        let result = service(users, hasher).authenticate(&credentials).await;
        if matches {
            assert_eq!(result.expect("authenticated"), user);
        } else {
            assert_eq!(result.expect_err("rejected").code(), ErrorCode::Unauthorized);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_account().return_once(|_| Ok(None));
        let credentials = LoginCredentials::try_from_parts("ghost", "whatever").expect("credentials");
        let err = service(users, MockPasswordHasher::new())
            .authenticate(&credentials)
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
