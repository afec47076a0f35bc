//! Source document loading.

pub mod error;
pub mod loader;

pub use error::DocumentError;
pub use loader::TextLoader;

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    /// Canonical path the content was read from.
    pub source: String,
    pub content_type: String,
}

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Document, DocumentError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}

/// Load a document, picking the loader from the file extension.
///
/// # Errors
///
/// Returns [`DocumentError::UnsupportedFormat`] for unknown extensions, or the
/// selected loader's error.
pub async fn load_document(path: &std::path::Path) -> Result<Document, DocumentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "txt" | "md" | "markdown" => TextLoader::default().load(path).await,
        #[cfg(feature = "pdf")]
        "pdf" => PdfLoader::default().load(path).await,
        _ => Err(DocumentError::UnsupportedFormat(ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[tokio::test]
    async fn dispatch_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "# Notes").unwrap();

        let doc = load_document(&file).await.unwrap();
        assert_eq!(doc.content, "# Notes");
        assert_eq!(doc.content_type, "text/markdown");
    }

    #[tokio::test]
    async fn unsupported_extension_rejected() {
        let result = load_document(Path::new("slides.pptx")).await;
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(ext)) if ext == "pptx"));
    }

    #[tokio::test]
    async fn missing_extension_rejected() {
        let result = load_document(Path::new("/etc/hostname-like")).await;
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));
    }
}
