use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can supply the listing catalog
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the full catalog
    async fn fetch(&self) -> Result<Vec<Listing>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
