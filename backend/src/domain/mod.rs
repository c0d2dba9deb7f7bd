//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: define the blog's entities (users, groups, posts, comments and
//! follow edges), the form validation rules applied to submissions, and the
//! services implementing the driving ports in [`ports`]. Nothing here knows
//! about HTTP, SQL or the filesystem.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload shared by every layer.
//! - User, Group, Post, Comment, Follow: entities and their identifiers.
//! - PostSubmission, SignupSubmission and their `*Form` redisplay states.
//! - PostQueryService, PostCommandService, FollowService,
//!   PasswordAccountService: use-case implementations.

pub mod account_service;
pub mod auth;
pub mod comment;
pub mod error;
pub mod follow;
pub mod follow_service;
pub mod forms;
pub mod group;
pub mod image;
pub mod listing;
pub mod ports;
pub mod post;
pub mod post_command_service;
pub mod post_query_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{DUPLICATE_USERNAME_MESSAGE, PasswordAccountService};
pub use self::auth::{LoginCredentials, LoginValidationError, StoredAccount};
pub use self::comment::{Comment, CommentId, CommentText, NewComment};
pub use self::error::{Error, ErrorCode};
pub use self::follow::{Follow, FollowOutcome, UnfollowOutcome};
pub use self::follow_service::FollowService;
pub use self::forms::{
    FieldErrors, INVALID_CHOICE_MESSAGE, INVALID_IMAGE_MESSAGE, LoginForm, NON_FIELD_ERRORS,
    PASSWORD_MIN_LEN, PostForm, PostSubmission, REQUIRED_MESSAGE, Registration, SignupForm,
    SignupSubmission, UploadedFile, ValidPost,
};
pub use self::group::{
    GROUP_SLUG_MAX, GROUP_TITLE_MAX, Group, GroupId, GroupSlug, GroupValidationError, NewGroup,
};
pub use self::image::{IMAGE_UPLOAD_DIR, ImageFormat, ImagePath, ImageUpload, InvalidImagePath};
pub use self::listing::{GroupListing, POSTS_PAGINATOR, POSTS_PER_PAGE, PostDetail, ProfileListing};
pub use self::post::{
    NewPost, POST_EXCERPT_CHARS, Post, PostChanges, PostFilter, PostId,
};
pub use self::post_command_service::{PostCommandDependencies, PostCommandService};
pub use self::post_query_service::{PostQueryRepositories, PostQueryService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};
