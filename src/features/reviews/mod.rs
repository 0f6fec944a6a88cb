//! Shop reviews. Ratings feed the average shown in search results.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/shops/{id}/reviews` | - | Reviews, newest first |
//! | POST | `/api/shops/{id}/reviews` | member | Review a shop you do not own |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReviewService;
