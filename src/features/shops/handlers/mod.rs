mod shop_handler;

pub use shop_handler::*;
