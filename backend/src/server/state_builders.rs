//! Assembly of the HTTP state from configured adapters.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use quill::domain::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use quill::inbound::http::state::{HttpState, HttpStateAdapters};
use quill::outbound::cache::MokaPageCache;
use quill::outbound::media::FsMediaStorage;
use quill::outbound::memory::MemoryStore;
use quill::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselFollowRepository, DieselGroupRepository,
    DieselPostRepository, DieselUserRepository,
};
use quill::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// The five repository ports, all backed by the same store.
struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            groups: Arc::new(DieselGroupRepository::new(pool.clone())),
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            follows: Arc::new(DieselFollowRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            groups: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            follows: Arc::new(store),
        }
    }
}

/// Build the HTTP state: Diesel repositories when a pool is configured,
/// otherwise the in-memory store.
///
/// # Errors
/// Returns [`io::Error`] when the media root cannot be created or opened.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let Repositories {
        users,
        groups,
        posts,
        comments,
        follows,
    } = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            Repositories::diesel(pool)
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on exit");
            Repositories::in_memory()
        }
    };
    let media = FsMediaStorage::open(&config.media_root).map_err(|error| {
        io::Error::other(format!(
            "open media root {}: {error}",
            config.media_root.display()
        ))
    })?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let state = HttpState::from(HttpStateAdapters {
        users,
        groups,
        posts,
        comments,
        follows,
        media: Arc::new(media),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        page_cache: Arc::new(MokaPageCache::new()),
        clock,
    });
    Ok(state.with_index_ttl(config.index_ttl))
}
