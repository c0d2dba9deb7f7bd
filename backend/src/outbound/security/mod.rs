//! Argon2id password hashing adapter.

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes passwords with Argon2id and the crate's default parameters.
/// Hashes are stored in PHC string format, so parameters can change later
/// without invalidating existing accounts.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash with explicit Argon2id cost parameters.
    ///
    /// # Examples
    /// ```
    /// use argon2::Params;
    /// use quill::domain::ports::PasswordHasher;
    /// use quill::outbound::security::Argon2PasswordHasher;
    ///
    /// let params = Params::new(8, 1, 1, None).expect("valid params");
    /// let hasher = Argon2PasswordHasher::with_params(params);
    /// let hash = hasher.hash("s3cret pass").expect("hash");
    /// assert!(hash.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
    /// ```
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(rand::thread_rng());
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| PasswordHashError::hash(format!("unreadable stored hash: {err}")))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}
