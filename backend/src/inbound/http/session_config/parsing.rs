//! Reading individual session toggles.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Environment lookups that apply the build mode's fallback policy.
pub(super) struct Toggles<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<'a, E: Env> Toggles<'a, E> {
    pub(super) fn new(env: &'a E, mode: BuildMode) -> Self {
        Self { env, mode }
    }

    /// Debug builds log and use `fallback`; release builds fail.
    fn fall_back<T: std::fmt::Debug>(
        &self,
        fallback: T,
        error: SessionConfigError,
    ) -> Result<T, SessionConfigError> {
        if self.mode.is_debug() {
            warn!(%error, ?fallback, "session toggle defaulted");
            Ok(fallback)
        } else {
            Err(error)
        }
    }

    pub(super) fn flag(&self, name: &'static str, fallback: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return self.fall_back(fallback, SessionConfigError::MissingEnv { name });
        };
        match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => self.fall_back(
                fallback,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: BOOL_EXPECTED,
                },
            ),
        }
    }

    /// `SameSite=None` is only accepted alongside a secure cookie in
    /// release builds.
    pub(super) fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let fallback = if self.mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.fall_back(fallback, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
        };
        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" => self.fall_back(SameSite::None, SessionConfigError::InsecureSameSiteNone),
            _ => self.fall_back(
                fallback,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
            ),
        }
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
