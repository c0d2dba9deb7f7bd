//! Server settings loaded via OrthoConfig.
//!
//! Values come from `--flags`, `QUILL_*` environment variables or a config
//! file, in decreasing precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ports::INDEX_PAGE_TTL;

const DEFAULT_MEDIA_ROOT: &str = "media";

/// Settings for the `quill` server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUILL")]
pub struct ServerSettings {
    /// Interface to listen on.
    pub host: Option<IpAddr>,
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Directory uploaded images are written to and served from.
    pub media_root: Option<PathBuf>,
    /// Seconds a rendered index page is reused.
    pub index_cache_ttl_secs: Option<u64>,
    /// Maximum database connections.
    pub db_pool_size: Option<u32>,
}

impl ServerSettings {
    /// Socket the server binds, defaulting to every IPv4 interface.
    pub fn bind_addr(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(host, self.port)
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn index_cache_ttl(&self) -> Duration {
        self.index_cache_ttl_secs
            .map_or(INDEX_PAGE_TTL, Duration::from_secs)
    }
}
