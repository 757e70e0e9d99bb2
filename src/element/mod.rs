mod metadata;


pub use metadata::{
    CoordinatesMetadata, ElementMetadata, FieldValue, MetadataError,
    MetadataField, RegexMetadata, RegexMetadataMap,
};

use serde::{Deserialize, Serialize};

/// Category of a partitioned document element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Heading that opens a new section
    Title,
    /// Body paragraph
    NarrativeText,
    ListItem,
    CheckBox,
    UncategorizedText,
    /// Text element without a more specific category
    Text,
    Header,
    Footer,
    FigureCaption,
    Address,
    EmailAddress,
    Formula,
    Image,
    /// Table; its markup, when known, lives in `metadata.text_as_html`
    Table,
    /// Marker between pages, usually with empty text
    PageBreak,
    PageNumber,
    CodeSnippet,
    Footnote,
    FormKeysValues,
    /// Any category this crate does not name, chunked as plain text
    #[serde(other)]
    Unknown,
}

/// One element produced by an upstream document partitioner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Category of this element
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Text content, possibly empty
    #[serde(default)]
    pub text: String,
    /// Per-element metadata
    #[serde(default)]
    pub metadata: ElementMetadata,
}

impl Element {
    /// Create an element with empty metadata
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            metadata: ElementMetadata::default(),
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Title, text)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text, text)
    }

    pub fn narrative_text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::NarrativeText, text)
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self::new(ElementKind::ListItem, text)
    }

    pub fn check_box() -> Self {
        Self::new(ElementKind::CheckBox, "")
    }

    pub fn table(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Table, text)
    }

    pub fn page_break() -> Self {
        Self::new(ElementKind::PageBreak, "")
    }

    /// Replace this element's metadata
    pub fn with_metadata(mut self, metadata: ElementMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Length of the text in characters
    pub fn text_length(&self) -> usize {
        self.text.chars().count()
    }
}
