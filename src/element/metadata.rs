use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Regex matches grouped by pattern name
pub type RegexMetadataMap = BTreeMap<String, Vec<RegexMetadata>>;

/// A single regex match recorded against an element's text
///
/// `start` and `end` are character offsets into the text of the element
/// (or chunk) that owns this metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexMetadata {
    /// The matched text
    pub text: String,
    /// Offset of the first matched character
    pub start: usize,
    /// Offset one past the last matched character
    pub end: usize,
}

impl RegexMetadata {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Copy of this match moved `offset` characters to the right
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            text: self.text.clone(),
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Bounding polygon of an element on its page
///
/// `system` names the coordinate space (`PixelSpace`, `RelativeCoordinateSystem`
/// and so on) and `layout_width`/`layout_height` give its extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatesMetadata {
    pub points: Vec<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_height: Option<f64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata field '{field}' cannot hold a {found} value")]
    TypeMismatch {
        field: &'static str,
        found: &'static str,
    },
}

/// Metadata attached to an element or chunk
///
/// The field set is closed. Anything an upstream partitioner wants carried
/// through chunking has to be a field here; other keys are dropped when
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_as_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_from: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasized_text_contents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasized_text_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_texts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_metadata: Option<RegexMetadataMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_class_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<CoordinatesMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_footer_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_continuation: Option<bool>,
}

/// Names every field of [`ElementMetadata`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    Filename,
    FileDirectory,
    Filetype,
    LastModified,
    Url,
    AttachedToFilename,
    PageNumber,
    PageName,
    Section,
    Subject,
    TextAsHtml,
    SentFrom,
    SentTo,
    EmphasizedTextContents,
    EmphasizedTextTags,
    LinkTexts,
    LinkUrls,
    Languages,
    RegexMetadata,
    CategoryDepth,
    DetectionClassProb,
    Coordinates,
    ParentId,
    ImagePath,
    DetectionOrigin,
    HeaderFooterType,
    IsContinuation,
}

impl MetadataField {
    /// Every field, in declaration order
    pub const ALL: [MetadataField; 27] = [
        MetadataField::Filename,
        MetadataField::FileDirectory,
        MetadataField::Filetype,
        MetadataField::LastModified,
        MetadataField::Url,
        MetadataField::AttachedToFilename,
        MetadataField::PageNumber,
        MetadataField::PageName,
        MetadataField::Section,
        MetadataField::Subject,
        MetadataField::TextAsHtml,
        MetadataField::SentFrom,
        MetadataField::SentTo,
        MetadataField::EmphasizedTextContents,
        MetadataField::EmphasizedTextTags,
        MetadataField::LinkTexts,
        MetadataField::LinkUrls,
        MetadataField::Languages,
        MetadataField::RegexMetadata,
        MetadataField::CategoryDepth,
        MetadataField::DetectionClassProb,
        MetadataField::Coordinates,
        MetadataField::ParentId,
        MetadataField::ImagePath,
        MetadataField::DetectionOrigin,
        MetadataField::HeaderFooterType,
        MetadataField::IsContinuation,
    ];

    /// Serialized name of the field
    pub fn name(self) -> &'static str {
        match self {
            MetadataField::Filename => "filename",
            MetadataField::FileDirectory => "file_directory",
            MetadataField::Filetype => "filetype",
            MetadataField::LastModified => "last_modified",
            MetadataField::Url => "url",
            MetadataField::AttachedToFilename => "attached_to_filename",
            MetadataField::PageNumber => "page_number",
            MetadataField::PageName => "page_name",
            MetadataField::Section => "section",
            MetadataField::Subject => "subject",
            MetadataField::TextAsHtml => "text_as_html",
            MetadataField::SentFrom => "sent_from",
            MetadataField::SentTo => "sent_to",
            MetadataField::EmphasizedTextContents => "emphasized_text_contents",
            MetadataField::EmphasizedTextTags => "emphasized_text_tags",
            MetadataField::LinkTexts => "link_texts",
            MetadataField::LinkUrls => "link_urls",
            MetadataField::Languages => "languages",
            MetadataField::RegexMetadata => "regex_metadata",
            MetadataField::CategoryDepth => "category_depth",
            MetadataField::DetectionClassProb => "detection_class_prob",
            MetadataField::Coordinates => "coordinates",
            MetadataField::ParentId => "parent_id",
            MetadataField::ImagePath => "image_path",
            MetadataField::DetectionOrigin => "detection_origin",
            MetadataField::HeaderFooterType => "header_footer_type",
            MetadataField::IsContinuation => "is_continuation",
        }
    }
}

/// The value of one populated metadata field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Float(f64),
    Flag(bool),
    List(Vec<String>),
    Coordinates(CoordinatesMetadata),
    Regex(RegexMetadataMap),
}

impl FieldValue {
    fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Flag(_) => "flag",
            FieldValue::List(_) => "list",
            FieldValue::Coordinates(_) => "coordinates",
            FieldValue::Regex(_) => "regex",
        }
    }
}

impl ElementMetadata {
    /// Value of `field`, if present
    pub fn get(&self, field: MetadataField) -> Option<FieldValue> {
        use MetadataField as F;

        match field {
            F::Filename => self.filename.clone().map(FieldValue::Text),
            F::FileDirectory => self.file_directory.clone().map(FieldValue::Text),
            F::Filetype => self.filetype.clone().map(FieldValue::Text),
            F::LastModified => self.last_modified.clone().map(FieldValue::Text),
            F::Url => self.url.clone().map(FieldValue::Text),
            F::AttachedToFilename => self.attached_to_filename.clone().map(FieldValue::Text),
            F::PageNumber => self.page_number.map(FieldValue::Integer),
            F::PageName => self.page_name.clone().map(FieldValue::Text),
            F::Section => self.section.clone().map(FieldValue::Text),
            F::Subject => self.subject.clone().map(FieldValue::Text),
            F::TextAsHtml => self.text_as_html.clone().map(FieldValue::Text),
            F::SentFrom => self.sent_from.clone().map(FieldValue::List),
            F::SentTo => self.sent_to.clone().map(FieldValue::List),
            F::EmphasizedTextContents => {
                self.emphasized_text_contents.clone().map(FieldValue::List)
            }
            F::EmphasizedTextTags => self.emphasized_text_tags.clone().map(FieldValue::List),
            F::LinkTexts => self.link_texts.clone().map(FieldValue::List),
            F::LinkUrls => self.link_urls.clone().map(FieldValue::List),
            F::Languages => self.languages.clone().map(FieldValue::List),
            F::RegexMetadata => self.regex_metadata.clone().map(FieldValue::Regex),
            F::CategoryDepth => self.category_depth.map(FieldValue::Integer),
            F::DetectionClassProb => self.detection_class_prob.map(FieldValue::Float),
            F::Coordinates => self.coordinates.clone().map(FieldValue::Coordinates),
            F::ParentId => self.parent_id.clone().map(FieldValue::Text),
            F::ImagePath => self.image_path.clone().map(FieldValue::Text),
            F::DetectionOrigin => self.detection_origin.clone().map(FieldValue::Text),
            F::HeaderFooterType => self.header_footer_type.clone().map(FieldValue::Text),
            F::IsContinuation => self.is_continuation.map(FieldValue::Flag),
        }
    }

    /// Set `field` to `value`
    ///
    /// Fails when the value's type does not match the field's declared type.
    pub fn set(&mut self, field: MetadataField, value: FieldValue) -> Result<(), MetadataError> {
        use FieldValue as V;
        use MetadataField as F;

        match (field, value) {
            (F::Filename, V::Text(v)) => self.filename = Some(v),
            (F::FileDirectory, V::Text(v)) => self.file_directory = Some(v),
            (F::Filetype, V::Text(v)) => self.filetype = Some(v),
            (F::LastModified, V::Text(v)) => self.last_modified = Some(v),
            (F::Url, V::Text(v)) => self.url = Some(v),
            (F::AttachedToFilename, V::Text(v)) => self.attached_to_filename = Some(v),
            (F::PageNumber, V::Integer(v)) => self.page_number = Some(v),
            (F::PageName, V::Text(v)) => self.page_name = Some(v),
            (F::Section, V::Text(v)) => self.section = Some(v),
            (F::Subject, V::Text(v)) => self.subject = Some(v),
            (F::TextAsHtml, V::Text(v)) => self.text_as_html = Some(v),
            (F::SentFrom, V::List(v)) => self.sent_from = Some(v),
            (F::SentTo, V::List(v)) => self.sent_to = Some(v),
            (F::EmphasizedTextContents, V::List(v)) => self.emphasized_text_contents = Some(v),
            (F::EmphasizedTextTags, V::List(v)) => self.emphasized_text_tags = Some(v),
            (F::LinkTexts, V::List(v)) => self.link_texts = Some(v),
            (F::LinkUrls, V::List(v)) => self.link_urls = Some(v),
            (F::Languages, V::List(v)) => self.languages = Some(v),
            (F::RegexMetadata, V::Regex(v)) => self.regex_metadata = Some(v),
            (F::CategoryDepth, V::Integer(v)) => self.category_depth = Some(v),
            (F::DetectionClassProb, V::Float(v)) => self.detection_class_prob = Some(v),
            (F::Coordinates, V::Coordinates(v)) => self.coordinates = Some(v),
            (F::ParentId, V::Text(v)) => self.parent_id = Some(v),
            (F::ImagePath, V::Text(v)) => self.image_path = Some(v),
            (F::DetectionOrigin, V::Text(v)) => self.detection_origin = Some(v),
            (F::HeaderFooterType, V::Text(v)) => self.header_footer_type = Some(v),
            (F::IsContinuation, V::Flag(v)) => self.is_continuation = Some(v),
            (field, value) => {
                return Err(MetadataError::TypeMismatch {
                    field: field.name(),
                    found: value.type_name(),
                })
            }
        }

        Ok(())
    }

    /// All populated fields with their values, in schema order
    pub fn populated_fields(&self) -> impl Iterator<Item = (MetadataField, FieldValue)> + '_ {
        MetadataField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }
}
