//! Port for storing and reading uploaded media.
use async_trait::async_trait;

use crate::domain::{Error, ImagePath, ImageUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by media storage adapters.
    pub enum MediaStorageError {
        /// Filesystem or object store failure.
        Io { message: String } => "media storage failure: {message}",
    }
}

/// Bytes of a stored file with the content type to serve them as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store a post image and return its path relative to the media root.
    /// An existing file with the same name is never overwritten.
    async fn store_image(&self, image: &ImageUpload) -> Result<ImagePath, MediaStorageError>;

    /// Read a stored file. `path` comes straight from a URL; adapters must
    /// refuse anything outside the media root.
    async fn load(&self, path: &str) -> Result<Option<StoredMedia>, MediaStorageError>;
}

impl From<MediaStorageError> for Error {
    fn from(err: MediaStorageError) -> Self {
        Error::internal(err.to_string())
    }
}
