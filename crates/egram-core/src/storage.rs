//! Blob storage contract for profile photos.
//!
//! Photos live on a third-party image host, not in the document store.
//! Only the returned public URL is persisted.

use crate::error::PortalResult;

pub trait PhotoStore: Send + Sync {
    /// Upload an image and return its public URL.
    fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> impl Future<Output = PortalResult<String>> + Send;
}
