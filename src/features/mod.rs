pub mod airports;
pub mod auth;
pub mod registry;
pub mod reviews;
pub mod search;
pub mod shops;
