//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel
//! - **memory**: in-process repositories used without a database
//! - **cache**: in-process page cache with per-entry expiry (moka)
//! - **media**: uploaded images on the local filesystem
//! - **security**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod cache;
pub mod media;
pub mod memory;
pub mod persistence;
pub mod security;
