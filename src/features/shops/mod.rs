//! Shop profiles.
//!
//! Each signed-in member owns at most one shop. Owners create and edit their
//! profile and manage its photos; anyone can read a shop.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/shops/{id}` | - | Shop with rating summary |
//! | GET | `/api/shops/me` | member | The caller's shop |
//! | POST | `/api/shops` | member | Create the caller's shop |
//! | PUT | `/api/shops/{id}` | owner | Replace shop details |
//! | DELETE | `/api/shops/{id}` | owner | Delete shop and photos |
//! | POST | `/api/shops/{id}/photos` | owner | Upload photos (multipart) |
//! | DELETE | `/api/shops/{id}/photos` | owner | Remove a photo by URL |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ShopService;
