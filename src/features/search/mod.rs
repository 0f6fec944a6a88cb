//! Shop search and ranking.
//!
//! A search resolves the airport code against the static airport table,
//! pulls candidate shops and their review ratings from a [`services::ShopDirectory`],
//! and ranks them: premium tier first, then nearest. The map endpoint runs the
//! same search and turns the result into markers, a centre and bounds.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/shops/search` | Ranked shops for the given filters |
//! | GET | `/api/shops/map` | Map markers for the same filters |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use error::SearchError;
pub use services::{PgShopDirectory, SearchService, ShopDirectory};
