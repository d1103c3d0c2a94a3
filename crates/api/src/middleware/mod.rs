//! Request extractors that guard routes.
//!
//! - [`admin_auth::RequireAdminToken`] -- Requires the operator bearer token.

pub mod admin_auth;
