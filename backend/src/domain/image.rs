//! Image attachments for posts.
//!
//! Uploads are accepted only when they decode as an image; the client
//! filename and content type are never trusted. Stored images live under the
//! [`IMAGE_UPLOAD_DIR`] prefix of the media root.

use std::fmt;
use std::io::Cursor;

use image::ImageReader;
use serde::{Deserialize, Serialize};

/// Media subdirectory that receives post images.
pub const IMAGE_UPLOAD_DIR: &str = "posts";

/// Image encodings accepted for post attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Gif,
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Guess the format from the first bytes of a file. This only reads the
    /// header; use [`ImageUpload::detect`] to check the whole file.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::sniff(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
    /// assert_eq!(ImageFormat::sniff(b"plain text"), None);
    /// ```
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes).ok().and_then(Self::from_codec)
    }

    fn from_codec(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            Self::Gif => image::ImageFormat::Gif,
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }

    /// MIME type served for this format.
    pub fn mime(self) -> &'static str {
        self.codec().to_mime_type()
    }

    /// Canonical file extension without the dot.
    pub fn extension(self) -> &'static str {
        self.codec()
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("img")
    }
}

/// Path of a stored image relative to the media root, e.g. `posts/cat.gif`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePath(String);

/// Raised when a stored image path is not a plain relative path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("image path must be a relative path without parent components: {0}")]
pub struct InvalidImagePath(pub String);

impl ImagePath {
    /// Validate a stored relative path.
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidImagePath> {
        let path = path.into();
        let plain = !path.is_empty()
            && !path.starts_with('/')
            && !path.contains('\\')
            && path
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if plain {
            Ok(Self(path))
        } else {
            Err(InvalidImagePath(path))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImagePath {
    type Error = InvalidImagePath;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An uploaded file that passed image detection.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Accept `bytes` as an image, or return `None` when they are not one.
    ///
    /// The client filename is reduced to a safe stem; the extension always
    /// follows the detected format.
    pub fn detect(file_name: &str, bytes: Vec<u8>) -> Option<Self> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .ok()?;
        let format = reader.format().and_then(ImageFormat::from_codec)?;
        reader.decode().ok()?;
        Some(Self {
            file_name: sanitise_file_name(file_name, format),
            format,
            bytes,
        })
    }

    /// Filename to store the upload under, before collision handling.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn sanitise_file_name(raw: &str, format: ImageFormat) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
    let cleaned: String = stem
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .take(64)
        .collect();
    let stem = if cleaned.is_empty() { "image" } else { cleaned.as_str() };
    format!("{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
    ];

    #[rstest]
    #[case(b"\x89PNG\r\n\x1a\n....".as_slice(), Some(ImageFormat::Png))]
    #[case(&[0xFF, 0xD8, 0xFF, 0xE0], Some(ImageFormat::Jpeg))]
    #[case(b"RIFF\x00\x00\x00\x00WEBPVP8 ".as_slice(), Some(ImageFormat::Webp))]
    #[case(b"RIFF\x00\x00\x00\x00WAVE".as_slice(), None)]
    #[case(b"".as_slice(), None)]
    fn sniffs_formats(#[case] bytes: &[u8], #[case] expected: Option<ImageFormat>) {
        assert_eq!(ImageFormat::sniff(bytes), expected);
    }

    #[rstest]
    fn detect_accepts_gif_and_normalises_name() {
        let upload = ImageUpload::detect("small.gif", SMALL_GIF.to_vec()).expect("gif");
        assert_eq!(upload.file_name(), "small.gif");
        assert_eq!(upload.format().mime(), "image/gif");
    }

    #[rstest]
    #[case("../../etc/passwd.gif", "passwd.gif")]
    #[case("C:\\photos\\me.png", "me.gif")]
    #[case("???.gif", "image.gif")]
    #[case("", "image.gif")]
    fn detect_sanitises_client_names(#[case] raw: &str, #[case] expected: &str) {
        let upload = ImageUpload::detect(raw, SMALL_GIF.to_vec()).expect("gif");
        assert_eq!(upload.file_name(), expected);
    }

    #[rstest]
    #[case(b"hello".as_slice())]
    #[case(b"GIF89a-not-really-an-image".as_slice())]
    #[case(b"\x89PNG\r\n\x1a\ntruncated".as_slice())]
    #[case(&SMALL_GIF[..20])]
    fn detect_rejects_files_that_do_not_decode(#[case] bytes: &[u8]) {
        assert!(ImageUpload::detect("notes.gif", bytes.to_vec()).is_none());
    }

    #[rstest]
    #[case(ImageFormat::Gif, "image/gif", "gif")]
    #[case(ImageFormat::Png, "image/png", "png")]
    #[case(ImageFormat::Jpeg, "image/jpeg", "jpg")]
    #[case(ImageFormat::Webp, "image/webp", "webp")]
    fn formats_name_their_mime_and_extension(
        #[case] format: ImageFormat,
        #[case] mime: &str,
        #[case] extension: &str,
    ) {
        assert_eq!(format.mime(), mime);
        assert_eq!(format.extension(), extension);
    }

    #[rstest]
    #[case("posts/small.gif", true)]
    #[case("posts/../secret", false)]
    #[case("/etc/passwd", false)]
    #[case("", false)]
    fn image_path_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(ImagePath::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn image_path_file_name() {
        let path = ImagePath::new("posts/small.gif").expect("valid");
        assert_eq!(path.file_name(), "small.gif");
    }
}
