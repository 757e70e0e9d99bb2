use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use crate::element::{ElementMetadata, FieldValue, MetadataField, RegexMetadataMap};

/// Every populated value of each metadata field, in element order
pub type MetadataValues = BTreeMap<MetadataField, Vec<FieldValue>>;

/// How values of one metadata field are merged into a chunk's metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolidationStrategy {
    /// Keep the first value seen
    First,
    /// Flatten all lists in order, keeping duplicates
    ListConcatenate,
    /// Flatten all lists in order, keeping only the first occurrence of each item
    ListUnique,
    /// Union of regex matches with offsets moved into chunk coordinates
    Regex,
    /// Per-element only, never carried onto a chunk
    Drop,
}

impl ConsolidationStrategy {
    pub fn for_field(field: MetadataField) -> Self {
        use MetadataField as F;

        match field {
            F::Filename
            | F::FileDirectory
            | F::Filetype
            | F::LastModified
            | F::Url
            | F::AttachedToFilename
            | F::PageNumber
            | F::PageName
            | F::Section
            | F::Subject
            | F::TextAsHtml
            | F::SentFrom
            | F::SentTo => ConsolidationStrategy::First,
            F::EmphasizedTextContents | F::EmphasizedTextTags | F::LinkTexts | F::LinkUrls => {
                ConsolidationStrategy::ListConcatenate
            }
            F::Languages => ConsolidationStrategy::ListUnique,
            F::RegexMetadata => ConsolidationStrategy::Regex,
            F::CategoryDepth
            | F::DetectionClassProb
            | F::Coordinates
            | F::ParentId
            | F::ImagePath
            | F::DetectionOrigin
            | F::HeaderFooterType
            | F::IsContinuation => ConsolidationStrategy::Drop,
        }
    }
}

/// Collect the values of every populated field across `metadata`
///
/// Fields that are not present on any element do not appear in the result.
pub fn all_metadata_values<'a, I>(metadata: I) -> MetadataValues
where
    I: IntoIterator<Item = &'a ElementMetadata>,
{
    let mut values = MetadataValues::new();
    for meta in metadata {
        for (field, value) in meta.populated_fields() {
            values.entry(field).or_default().push(value);
        }
    }
    values
}

/// Union regex matches of several elements
///
/// Each entry pairs an element's matches with that element's character
/// offset in the combined text. Matches stay grouped by pattern name, in
/// element order and then match order.
pub fn consolidate_regex_metadata<'a, I>(entries: I) -> RegexMetadataMap
where
    I: IntoIterator<Item = (usize, &'a RegexMetadataMap)>,
{
    let mut consolidated = RegexMetadataMap::new();
    for (offset, regex_metadata) in entries {
        for (name, matches) in regex_metadata {
            consolidated
                .entry(name.clone())
                .or_default()
                .extend(matches.iter().map(|m| m.shifted(offset)));
        }
    }
    consolidated
}

/// Merge collected field values into one metadata record
///
/// `regex_metadata` is the already offset-adjusted union of matches and is
/// used for the `regex_metadata` field. A field whose merged value would be
/// empty is left absent.
pub fn consolidate(values: &MetadataValues, regex_metadata: RegexMetadataMap) -> ElementMetadata {
    let mut consolidated = ElementMetadata::default();
    let mut regex_metadata = Some(regex_metadata);

    for (&field, field_values) in values {
        let merged = match ConsolidationStrategy::for_field(field) {
            ConsolidationStrategy::First => field_values.first().cloned(),
            ConsolidationStrategy::ListConcatenate => {
                let items: Vec<String> = list_items(field_values).cloned().collect();
                (!items.is_empty()).then_some(FieldValue::List(items))
            }
            ConsolidationStrategy::ListUnique => {
                let mut seen = HashSet::new();
                let items: Vec<String> = list_items(field_values)
                    .filter(|item| seen.insert(item.as_str()))
                    .cloned()
                    .collect();
                (!items.is_empty()).then_some(FieldValue::List(items))
            }
            ConsolidationStrategy::Regex => regex_metadata
                .take()
                .filter(|regex| !regex.is_empty())
                .map(FieldValue::Regex),
            ConsolidationStrategy::Drop => None,
        };

        if let Some(value) = merged {
            if let Err(err) = consolidated.set(field, value) {
                warn!("dropping metadata field during consolidation: {}", err);
            }
        }
    }

    consolidated
}

fn list_items(values: &[FieldValue]) -> impl Iterator<Item = &String> {
    values.iter().flat_map(|value| match value {
        FieldValue::List(items) => items.as_slice(),
        _ => &[],
    })
}
