//! Aircraft registry lookup.
//!
//! Only a simulated registry exists today ([`services::StubRegistry`]); a real
//! registry client plugs in behind [`services::RegistryLookup`].
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/registry/validate` | Look up an aircraft by tail number |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::{RegistryLookup, StubRegistry};
