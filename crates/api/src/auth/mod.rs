//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification and strength rules.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;
