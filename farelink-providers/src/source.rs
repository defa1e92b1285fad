use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read provider data: {0}")]
    Io(#[from] std::io::Error),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Opaque raw-payload retrieval. Adapters are handed a pre-configured
/// source at construction and never know where the bytes come from.
#[async_trait]
pub trait RawSource: Send + Sync {
    async fn fetch_payload(&self) -> Result<String, SourceError>;
}

/// Reads a provider response snapshot from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RawSource for FileSource {
    async fn fetch_payload(&self) -> Result<String, SourceError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
