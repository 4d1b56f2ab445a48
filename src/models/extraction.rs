//! Extraction result model.

use serde::{Deserialize, Serialize};

/// Which upstream rendering the text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Html,
    Pdf,
}

impl ContentSource {
    /// Lowercase identifier
    pub fn id(&self) -> &'static str {
        match self {
            ContentSource::Html => "html",
            ContentSource::Pdf => "pdf",
        }
    }

    /// Uppercase tag used in content headers
    pub fn tag(&self) -> &'static str {
        match self {
            ContentSource::Html => "HTML",
            ContentSource::Pdf => "PDF",
        }
    }
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Text extracted for one paper, with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Header plus normalized body text
    pub content: String,

    pub source: ContentSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_source_tags() {
        assert_eq!(ContentSource::Html.tag(), "HTML");
        assert_eq!(ContentSource::Pdf.to_string(), "pdf");
        assert_eq!(
            serde_json::to_string(&ContentSource::Pdf).unwrap(),
            "\"pdf\""
        );
    }
}
