mod shop;

pub use shop::{Shop, ShopDetail, ShopTier, SHOP_COLUMNS};
