mod shop_service;

pub use shop_service::{photo_extension, PhotoUpload, ShopService};
