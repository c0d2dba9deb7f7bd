//! Filesystem media storage under a capability-scoped root directory.
//!
//! All access goes through a `cap_std` directory handle, so paths taken from
//! URLs cannot escape the media root. Blocking file I/O runs on the Tokio
//! blocking pool.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::debug;

use crate::domain::ports::{MediaStorage, MediaStorageError, StoredMedia};
use crate::domain::{IMAGE_UPLOAD_DIR, ImageFormat, ImagePath, ImageUpload};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_NAME_ATTEMPTS: usize = 16;

/// Media storage rooted at a directory on the local filesystem.
#[derive(Clone)]
pub struct FsMediaStorage {
    root: Arc<Dir>,
}

impl FsMediaStorage {
    /// Open `root`, creating it and the image subdirectory when missing.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        dir.create_dir_all(IMAGE_UPLOAD_DIR)?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }
}

fn io_error(err: impl std::fmt::Display) -> MediaStorageError {
    MediaStorageError::io(err.to_string())
}

fn candidate_name(file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_owned();
    }
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    match file_name.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}_{suffix}.{extension}"),
        None => format!("{file_name}_{suffix}"),
    }
}

fn write_new(root: &Dir, file_name: &str, bytes: &[u8]) -> io::Result<String> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let relative = format!("{IMAGE_UPLOAD_DIR}/{}", candidate_name(file_name, attempt));
        match root.open_with(&relative, &options) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(relative);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {file_name}"),
    ))
}

#[async_trait]
impl MediaStorage for FsMediaStorage {
    async fn store_image(&self, image: &ImageUpload) -> Result<ImagePath, MediaStorageError> {
        let root = Arc::clone(&self.root);
        let file_name = image.file_name().to_owned();
        let bytes = image.bytes().to_vec();
        let relative = tokio::task::spawn_blocking(move || write_new(&root, &file_name, &bytes))
            .await
            .map_err(io_error)?
            .map_err(io_error)?;
        debug!(path = %relative, "stored post image");
        ImagePath::new(relative).map_err(io_error)
    }

    async fn load(&self, path: &str) -> Result<Option<StoredMedia>, MediaStorageError> {
        let Ok(path) = ImagePath::new(path) else {
            return Ok(None);
        };
        let root = Arc::clone(&self.root);
        let read = tokio::task::spawn_blocking(move || -> io::Result<Option<Vec<u8>>> {
            if root.metadata(path.as_str())?.is_file() {
                root.read(path.as_str()).map(Some)
            } else {
                Ok(None)
            }
        })
        .await
        .map_err(io_error)?;
        match read {
            Ok(None) => Ok(None),
            Ok(Some(bytes)) => {
                let content_type = ImageFormat::sniff(&bytes)
                    .map_or(FALLBACK_CONTENT_TYPE, ImageFormat::mime)
                    .to_owned();
                Ok(Some(StoredMedia {
                    content_type,
                    bytes,
                }))
            }
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(io_error(err)),
        }
    }
}
