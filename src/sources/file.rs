use crate::models::Listing;
use crate::sources::catalog::listings_from_document;
use crate::sources::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Catalog stored as a JSON document on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ListingSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        debug!("Reading catalog from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read catalog file {}", self.path.display()))?;
        let document: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("Catalog file {} is not valid JSON", self.path.display()))?;

        let listings = listings_from_document(&document);
        info!("Loaded {} listings from {}", listings.len(), self.path.display());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_fetch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"listings": [{{"id": "x1", "propertyType": "Villa", "price": "₹ 1,20,000"}}]}}"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let listings = source.fetch().await.unwrap();

        assert_eq!(source.source_name(), "file");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].property_type, "Villa");
        assert_eq!(listings[0].price, 120000.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = JsonFileSource::new(file.path()).fetch().await.unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
