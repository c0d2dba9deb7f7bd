//! Topical groups that posts may optionally belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a group title.
pub const GROUP_TITLE_MAX: usize = 200;
/// Maximum length of a group slug.
pub const GROUP_SLUG_MAX: usize = 500;

/// Validation errors raised while building groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    #[error("group title must not be empty")]
    EmptyTitle,
    #[error("group title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("group slug must not be empty")]
    EmptySlug,
    #[error("group slug must be at most {max} characters")]
    SlugTooLong { max: usize },
    #[error("group slug may only contain letters, digits, hyphens and underscores")]
    SlugInvalidCharacters,
}

/// Database identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe unique address of a group, e.g. `/group/cats/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a slug.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::GroupSlug;
    ///
    /// assert!(GroupSlug::new("test-slug_1").is_ok());
    /// assert!(GroupSlug::new("with space").is_err());
    /// ```
    pub fn new(slug: impl Into<String>) -> Result<Self, GroupValidationError> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(GroupValidationError::EmptySlug);
        }
        if slug.chars().count() > GROUP_SLUG_MAX {
            return Err(GroupValidationError::SlugTooLong {
                max: GROUP_SLUG_MAX,
            });
        }
        let allowed = slug
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !allowed {
            return Err(GroupValidationError::SlugInvalidCharacters);
        }
        Ok(Self(slug))
    }

    /// Borrow the slug.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A topical collection of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    /// Build a group from stored parts.
    pub fn new(
        id: GroupId,
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug,
            description: description.into(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Validated request to create a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub title: String,
    pub slug: GroupSlug,
    pub description: String,
}

impl NewGroup {
    /// Validate raw administrator input.
    pub fn try_from_parts(
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Self, GroupValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX {
            return Err(GroupValidationError::TitleTooLong {
                max: GROUP_TITLE_MAX,
            });
        }
        Ok(Self {
            title: title.to_owned(),
            slug: GroupSlug::new(slug.trim())?,
            description: description.trim().to_owned(),
        })
    }
}
