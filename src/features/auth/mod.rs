//! Authentication delegated to the hosted identity backend.
//!
//! Sign-in flows (magic link, password) are relayed to the backend; this
//! service only validates the access tokens it issues (JWT against the
//! published JWKS) and exposes the caller as [`model::AuthenticatedUser`].

mod jwks;
mod validator;

pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
