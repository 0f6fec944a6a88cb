//! Static airport lookup table.
//!
//! Airports are loaded once at startup (embedded dataset or `AIRPORTS_FILE`)
//! and shared read-only. Search uses [`AirportService::resolve`] to turn an
//! airport code into coordinates.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/airports` | List airports, optional `search` substring |
//! | GET | `/api/airports/{code}` | Get airport by code |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AirportService;
