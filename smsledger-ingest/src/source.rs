//! Where raw messages come from.

use std::future::Future;
use std::path::PathBuf;

use smsledger_core::{Error, MessageFilter, Result};

/// A device message store (or a stand-in for one).
///
/// Implementations return the JSON-encoded message list for `filter`, or
/// `Error::Retrieval` with the store's failure detail.
pub trait MessageSource {
    fn list(&self, filter: &MessageFilter) -> impl Future<Output = Result<String>> + Send;
}

/// Reads an inbox previously exported to a JSON file (an array of message objects).
///
/// The export is taken to be the requested mailbox; `max_count` is enforced by the pipeline.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MessageSource for JsonFileSource {
    async fn list(&self, _filter: &MessageFilter) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Retrieval(format!("reading {}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_retrieval_failure() {
        let source = JsonFileSource::new("/nonexistent/smsledger/inbox.json");
        let err = source.list(&MessageFilter::default()).await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(ref detail) if detail.contains("inbox.json")));
    }

    #[tokio::test]
    async fn test_reads_file_contents() {
        let path = std::env::temp_dir().join(format!("smsledger-source-{}.json", std::process::id()));
        tokio::fs::write(&path, "[]").await.unwrap();
        let payload = JsonFileSource::new(&path)
            .list(&MessageFilter::default())
            .await
            .unwrap();
        assert_eq!(payload, "[]");
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
