//! HTTP inbound adapter serving the server-rendered blog.
//!
//! Handlers resolve the signed-in user from the cookie session, call the
//! driving ports held in [`state::HttpState`] and render HTML with
//! [`pages`].

pub mod about;
pub mod accounts;
pub mod auth;
pub mod error;
pub mod follows;
pub mod form_data;
pub mod health;
pub mod media;
pub mod pages;
pub mod posts;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;

pub use error::ApiResult;
