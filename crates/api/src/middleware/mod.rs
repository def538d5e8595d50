//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user behind a Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `ADMIN` role.
//! - [`rbac::RequireStaff`] -- requires `ADMIN` or `ATTENDANT`.

pub mod auth;
pub mod rbac;
