//! Port for one-way password hashing.
use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed or a stored hash could not be parsed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes new passwords and checks candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Whether `password` matches `stored_hash`.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}

impl From<PasswordHashError> for Error {
    fn from(err: PasswordHashError) -> Self {
        Error::internal(err.to_string())
    }
}
