//! # Taskdesk Shared Library
//!
//! This crate contains the data layer and authentication primitives shared by
//! the Taskdesk API server (and any future binaries such as maintenance
//! tooling).
//!
//! ## Module Organization
//!
//! - `models`: Database models, their CRUD operations, and the referential
//!   delete guards
//! - `auth`: Password hashing, JWT tokens, and the request authentication
//!   middleware
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskdesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
