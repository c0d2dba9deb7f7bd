//! Form submissions, their validation, and the state needed to redisplay
//! them with field errors.
//!
//! Adapters decode request bodies into the `*Submission` types. Validation
//! either yields a value ready for a service call or a `*Form` echoing the
//! submitted values with messages keyed by field name.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use super::{Group, GroupId, ImageUpload, Post, Username};

/// Key under which errors not tied to one field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field; empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Messages not tied to a field.
    pub fn non_field(&self) -> &[String] {
        self.field(NON_FIELD_ERRORS)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// A file received in a multipart body, before image detection.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    /// Browsers send an empty part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.file_name.is_empty()
    }
}

/// Raw post form values as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSubmission {
    pub text: String,
    /// Selected group id; empty or absent means "no group".
    pub group: Option<String>,
    pub image: Option<UploadedFile>,
}

/// Post form values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub text: String,
    pub group: Option<GroupId>,
    pub image: Option<ImageUpload>,
}

/// Post form state for rendering: the values to prefill and any errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub text: String,
    pub group: Option<GroupId>,
    pub errors: FieldErrors,
}

impl PostForm {
    /// Unbound form for a new post.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form prefilled with an existing post's values.
    pub fn for_post(post: &Post) -> Self {
        Self {
            text: post.text().to_owned(),
            group: post.group().map(Group::id),
            errors: FieldErrors::new(),
        }
    }
}

impl PostSubmission {
    /// Validate the submission against the groups that may be selected.
    ///
    /// Text is trimmed and required. A group value must name one of
    /// `groups`. An attached file must be a recognised image.
    pub fn validate(self, groups: &[Group]) -> Result<ValidPost, PostForm> {
        let mut errors = FieldErrors::new();

        let text = self.text.trim().to_owned();
        if text.is_empty() {
            errors.add("text", REQUIRED_MESSAGE);
        }

        let raw_group = self
            .group
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let group = match raw_group {
            None => None,
            Some(raw) => {
                let found = raw
                    .parse::<i64>()
                    .ok()
                    .map(GroupId::new)
                    .filter(|id| groups.iter().any(|group| group.id() == *id));
                if found.is_none() {
                    errors.add("group", INVALID_CHOICE_MESSAGE);
                }
                found
            }
        };

        let image = match self.image.filter(|file| !file.is_empty()) {
            None => None,
            Some(file) => {
                let detected = ImageUpload::detect(&file.file_name, file.bytes);
                if detected.is_none() {
                    errors.add("image", INVALID_IMAGE_MESSAGE);
                }
                detected
            }
        };

        if errors.is_empty() {
            Ok(ValidPost { text, group, image })
        } else {
            Err(PostForm {
                text: self.text,
                group,
                errors,
            })
        }
    }
}

/// Raw sign-up form values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupSubmission {
    pub username: String,
    pub password1: Zeroizing<String>,
    pub password2: Zeroizing<String>,
}

impl std::fmt::Debug for SignupSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupSubmission")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// A validated request to create an account.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Registration {
    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Sign-up form state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub errors: FieldErrors,
}

impl SignupForm {
    pub fn blank() -> Self {
        Self::default()
    }

    /// Redisplay `username` with a single error against `field`.
    pub fn with_error(username: impl Into<String>, field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self {
            username: username.into(),
            errors,
        }
    }
}

impl SignupSubmission {
    /// Check the shape of the submission. Username availability is checked
    /// by the account service.
    pub fn validate(self) -> Result<Registration, SignupForm> {
        let mut errors = FieldErrors::new();
        let raw_username = self.username.trim().to_owned();

        let username = if raw_username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
            None
        } else {
            Username::new(raw_username.clone())
                .map_err(|err| errors.add("username", err.to_string()))
                .ok()
        };

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED_MESSAGE);
        } else if self.password1.chars().count() < PASSWORD_MIN_LEN {
            errors.add(
                "password1",
                format!("This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."),
            );
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED_MESSAGE);
        } else if self.password1.as_str() != self.password2.as_str() {
            errors.add("password2", "The two password fields didn't match.");
        }

        match username {
            Some(username) if errors.is_empty() => Ok(Registration {
                username,
                password: self.password1,
            }),
            _ => Err(SignupForm {
                username: raw_username,
                errors,
            }),
        }
    }
}

/// Log-in form state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    /// Local path to return to after logging in.
    pub next: Option<String>,
    pub errors: FieldErrors,
}
