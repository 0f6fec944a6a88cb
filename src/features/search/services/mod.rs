mod directory;
mod map_builder;
mod pg_directory;
mod ranking;
mod search_service;

pub use directory::{CandidateQuery, ReviewRating, ShopDirectory};
pub use map_builder::build_map_view;
pub use pg_directory::PgShopDirectory;
pub use ranking::{rank, RankCriteria};
pub use search_service::SearchService;
