use async_trait::async_trait;

use crate::core::error::AppError;

/// Object storage for publicly served files
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Object key for a publicly readable file, e.g. `public/shop-photos/u1/x.jpg`
    fn public_key(&self, path: &str) -> String;

    /// Direct URL for a public object
    fn public_url(&self, key: &str) -> String;

    /// Object key behind a URL produced by this store, if any
    fn extract_key_from_url(&self, url: &str) -> Option<String>;

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
