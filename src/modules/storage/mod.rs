//! Storage module for shop photos
//!
//! Provides a MinIO/S3-compatible storage client for uploads and deletes
//! of publicly readable objects.

mod minio_client;
mod object_store;

pub use minio_client::MinIOClient;
pub use object_store::ObjectStore;
