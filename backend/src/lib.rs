//! Quill: a server-rendered community blog.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, form
//! rules and use-case services behind ports; [`inbound`] adapts HTTP
//! requests onto those ports; [`outbound`] implements the driven ports
//! against PostgreSQL, process memory and the filesystem.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
