//! Test utilities for the quill crate.
//!
//! Shared by unit tests (in `src/`) and the HTTP integration suites (in
//! `tests/`). Compiled only for tests or with the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use argon2::Params;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::Trace;
use crate::domain::ports::{
    CachedPage, GroupRepository, MediaStorage, MediaStorageError, PageCache, PageCacheError,
    PageCacheKey, PasswordHasher, PostRepository, StoredMedia, UserRepository,
};
use crate::domain::{
    Group, IMAGE_UPLOAD_DIR, ImagePath, ImageUpload, NewGroup, NewPost, Post, User, Username,
};
use crate::inbound::http::routes::{configure, not_found};
use crate::inbound::http::session::SESSION_COOKIE_NAME;
use crate::inbound::http::state::{HttpState, HttpStateAdapters};
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::Argon2PasswordHasher;

/// Password given to every account created by [`TestWorld::user`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Smallest well-formed GIF: one transparent pixel.
pub const PIXEL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF, 0xFF,
    0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
];

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Uses the production cookie name and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Argon2id with the smallest legal costs. Hashes still verify with the
/// production hasher.
pub fn fast_hasher() -> Argon2PasswordHasher {
    match Params::new(8, 1, 1, None) {
        Ok(params) => Argon2PasswordHasher::with_params(params),
        Err(error) => panic!("minimal argon2 params: {error}"),
    }
}

/// Clock frozen at a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at noon on 1 March 2024.
    pub fn at_default_instant() -> Self {
        let now = match Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single() {
            Some(now) => now,
            None => panic!("default instant is unambiguous"),
        };
        Self::new(now)
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}"),
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

struct ClockedEntry {
    page: CachedPage,
    expires_at: DateTime<Utc>,
}

/// Page cache whose entries expire against an injected [`Clock`], so tests
/// can step over a time-to-live without sleeping.
#[derive(Clone)]
pub struct ClockedPageCache {
    entries: Arc<Mutex<HashMap<PageCacheKey, ClockedEntry>>>,
    clock: Arc<dyn Clock>,
}

impl ClockedPageCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<PageCacheKey, ClockedEntry>>, PageCacheError>
    {
        self.entries
            .lock()
            .map_err(|_| PageCacheError::backend("page cache mutex poisoned"))
    }
}

#[async_trait]
impl PageCache for ClockedPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<CachedPage>, PageCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        let page = entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.page.clone());
        if page.is_none() {
            entries.remove(key);
        }
        Ok(page)
    }

    async fn put(
        &self,
        key: &PageCacheKey,
        page: CachedPage,
        ttl: Duration,
    ) -> Result<(), PageCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|error| PageCacheError::backend(format!("ttl out of range: {error}")))?;
        let expires_at = self.clock.utc() + ttl;
        self.lock()?.insert(key.clone(), ClockedEntry { page, expires_at });
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        self.lock()?.clear();
        Ok(())
    }
}

/// Media storage keeping files in a map. Names never clash: a repeated
/// file name gets a numeric prefix.
#[derive(Clone, Default)]
pub struct MemoryMediaStorage {
    files: Arc<Mutex<HashMap<String, StoredMedia>>>,
}

impl MemoryMediaStorage {
    /// Paths of every stored file.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = match self.files.lock() {
            Ok(files) => files.keys().cloned().collect(),
            Err(_) => panic!("media mutex"),
        };
        paths.sort();
        paths
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn store_image(&self, image: &ImageUpload) -> Result<ImagePath, MediaStorageError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| MediaStorageError::io("media mutex poisoned"))?;
        let mut path = format!("{IMAGE_UPLOAD_DIR}/{}", image.file_name());
        let mut attempt = 1;
        while files.contains_key(&path) {
            path = format!("{IMAGE_UPLOAD_DIR}/{attempt}_{}", image.file_name());
            attempt += 1;
        }
        files.insert(
            path.clone(),
            StoredMedia {
                content_type: image.format().mime().to_owned(),
                bytes: image.bytes().to_vec(),
            },
        );
        ImagePath::new(path).map_err(|err| MediaStorageError::io(err.to_string()))
    }

    async fn load(&self, path: &str) -> Result<Option<StoredMedia>, MediaStorageError> {
        let files = self
            .files
            .lock()
            .map_err(|_| MediaStorageError::io("media mutex poisoned"))?;
        Ok(files.get(path).cloned())
    }
}

/// Everything an HTTP test needs: the HTTP state plus handles on the
/// adapters behind it so tests can seed data and inspect effects.
#[derive(Clone)]
pub struct TestWorld {
    pub store: MemoryStore,
    pub cache: ClockedPageCache,
    pub media: MemoryMediaStorage,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl TestWorld {
    /// Wire the in-memory adapters together at the default instant.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(MutableClock::at_default_instant());
        let cache = ClockedPageCache::new(clock.clone());
        let media = MemoryMediaStorage::default();
        let state = HttpState::from(HttpStateAdapters {
            users: Arc::new(store.clone()),
            groups: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            follows: Arc::new(store.clone()),
            media: Arc::new(media.clone()),
            hasher: Arc::new(fast_hasher()),
            page_cache: Arc::new(cache.clone()),
            clock: clock.clone(),
        });
        Self {
            store,
            cache,
            media,
            clock,
            state,
        }
    }

    /// An app serving every page from this world.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(test_session_middleware())
            .wrap(Trace)
            .configure(configure)
            .default_service(web::to(not_found))
    }

    /// Create an account whose password is [`TEST_PASSWORD`].
    pub async fn user(&self, name: &str) -> User {
        let username =
            Username::new(name).unwrap_or_else(|error| panic!("fixture username {name}: {error}"));
        let hash = fast_hasher()
            .hash(TEST_PASSWORD)
            .unwrap_or_else(|error| panic!("hash fixture password: {error}"));
        UserRepository::create(&self.store, &username, &hash)
            .await
            .unwrap_or_else(|error| panic!("create fixture user {name}: {error}"))
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        let group = NewGroup::try_from_parts(title, slug, "")
            .unwrap_or_else(|error| panic!("fixture group {slug}: {error}"));
        GroupRepository::create(&self.store, &group)
            .await
            .unwrap_or_else(|error| panic!("create fixture group {slug}: {error}"))
    }

    /// Publish a post now, then move the clock on a minute so later posts
    /// sort above it.
    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let post = PostRepository::create(
            &self.store,
            &NewPost {
                author: *author.id(),
                text: text.to_owned(),
                group: group.map(Group::id),
                image: None,
                pub_date: self.clock.utc(),
            },
        )
        .await
        .unwrap_or_else(|error| panic!("create fixture post: {error}"));
        self.clock.advance_seconds(60);
        post
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
