//! Uploaded document type

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One uploaded artifact held by the registry.
///
/// Fields are private so that `size` can never disagree with `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    identity: String,
    content: Bytes,
    size: usize,
    content_type: Option<String>,
}

impl Document {
    /// Create a document, computing its size from the payload
    pub fn new(
        identity: impl Into<String>,
        content: impl Into<Bytes>,
        content_type: Option<String>,
    ) -> Self {
        let content = content.into();
        Self {
            identity: identity.into(),
            size: content.len(),
            content,
            content_type,
        }
    }

    /// Registry key (the uploaded filename)
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Raw uploaded bytes
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Byte length of the content
    pub fn size(&self) -> usize {
        self.size
    }

    /// Client-declared content type, unverified
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content as text when it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary::from(self)
    }
}

/// Listing entry for a stored document; never carries content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document identity
    pub name: String,
    /// Size in bytes
    pub size: usize,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            name: doc.identity.clone(),
            size: doc.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_follows_content() {
        let doc = Document::new("a.txt", b"hello".to_vec(), Some("text/plain".to_string()));
        assert_eq!(doc.identity(), "a.txt");
        assert_eq!(doc.size(), 5);
        assert_eq!(doc.content().as_ref(), b"hello");
        assert_eq!(doc.content_type(), Some("text/plain"));
        assert_eq!(doc.text(), Some("hello"));
    }

    #[test]
    fn test_binary_content_has_no_text() {
        let doc = Document::new("blob.bin", vec![0xff, 0xfe, 0x00], None);
        assert_eq!(doc.size(), 3);
        assert!(doc.text().is_none());
        assert!(doc.content_type().is_none());
    }

    #[test]
    fn test_summary_serialization() {
        let doc = Document::new("report.pdf", Bytes::from_static(b"%PDF-1.4"), None);
        let json = serde_json::to_value(doc.summary()).unwrap();
        assert_eq!(json, serde_json::json!({"name": "report.pdf", "size": 8}));
    }
}
