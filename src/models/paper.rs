//! Paper models: search hits and caller-supplied metadata.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An author entry as callers send it: `{"name": "..."}`, a bare string, or
/// anything else, which is rendered as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorEntry {
    Named { name: String },
    Plain(String),
    Other(Value),
}

impl AuthorEntry {
    /// The name to display, preferring the `name` field when present
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            AuthorEntry::Named { name } => Cow::Borrowed(name),
            AuthorEntry::Plain(name) => Cow::Borrowed(name),
            AuthorEntry::Other(value) => Cow::Owned(value.to_string()),
        }
    }
}

impl From<&str> for AuthorEntry {
    fn from(name: &str) -> Self {
        AuthorEntry::Plain(name.to_string())
    }
}

/// Join author entries with `", "`
pub fn join_authors(authors: &[AuthorEntry]) -> String {
    authors
        .iter()
        .map(AuthorEntry::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `null` deserializes to the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional bibliographic metadata used to build the content header.
///
/// Only presence is checked; values are rendered as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub published: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<AuthorEntry>,
}

impl PaperMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn published(mut self, published: impl Into<String>) -> Self {
        self.published = published.into();
        self
    }

    pub fn author(mut self, author: AuthorEntry) -> Self {
        self.authors.push(author);
        self
    }
}

/// A paper returned by the arXiv search API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivPaper {
    /// Last path segment of the abstract URL, version included
    pub id: String,

    /// Abstract page URL
    pub url: String,

    pub title: String,

    pub summary: String,

    /// Publication timestamp (RFC 3339)
    pub published: String,

    pub authors: Vec<AuthorEntry>,
}
