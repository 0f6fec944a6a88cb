/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// SEARCH
// =============================================================================

/// Map view shown when a search returns no shops (New York City)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (40.730610, -73.935242);

// =============================================================================
// SHOPS
// =============================================================================

/// Maximum size of a single shop photo (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Storage folder for shop photos, below the public prefix
pub const SHOP_PHOTOS_FOLDER: &str = "shop-photos";

/// Image types accepted for shop photos, with the extension they are stored under
pub const ALLOWED_PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];
