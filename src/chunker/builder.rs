use super::pre_chunk::TextPreChunk;
use super::TEXT_SEPARATOR_LEN;
use crate::element::Element;

/// Accumulates elements for the next text pre-chunk
///
/// Tracks the length the joined text would have so the splitter can decide
/// whether the next element still fits.
#[derive(Debug, Clone)]
pub struct TextPreChunkBuilder {
    maxlen: usize,
    elements: Vec<Element>,
    text_len: usize,
    /// Elements with non-empty text, each of which costs a separator
    segment_count: usize,
}

impl TextPreChunkBuilder {
    pub(crate) fn new(maxlen: usize) -> Self {
        Self {
            maxlen,
            elements: Vec::new(),
            text_len: 0,
            segment_count: 0,
        }
    }

    pub fn add_element(&mut self, element: Element) {
        let len = element.text_length();
        if len > 0 {
            self.text_len += len;
            self.segment_count += 1;
        }
        self.elements.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Length of the joined text of the elements added so far
    pub fn text_length(&self) -> usize {
        self.text_len + TEXT_SEPARATOR_LEN * self.segment_count.saturating_sub(1)
    }

    /// Characters left for the next element
    ///
    /// Reserves room for the separator that element would be joined with.
    pub fn remaining_space(&self) -> usize {
        self.maxlen
            .saturating_sub(self.text_len)
            .saturating_sub(TEXT_SEPARATOR_LEN * self.segment_count)
    }

    /// Hand off the accumulated elements and start over
    ///
    /// Returns `None` when nothing has been added.
    pub fn flush(&mut self) -> Option<TextPreChunk> {
        if self.elements.is_empty() {
            return None;
        }

        self.text_len = 0;
        self.segment_count = 0;
        Some(TextPreChunk::new(std::mem::take(&mut self.elements)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder() {
        let builder = TextPreChunkBuilder::new(50);

        assert!(builder.is_empty());
        assert_eq!(builder.text_length(), 0);
        assert_eq!(builder.remaining_space(), 50);
    }

    #[test]
    fn test_tracks_length_and_remaining_space() {
        let mut builder = TextPreChunkBuilder::new(150);

        builder.add_element(Element::title("Introduction"));
        assert_eq!(builder.text_length(), 12);
        assert_eq!(builder.remaining_space(), 136);

        builder.add_element(Element::text(
            "Lorem ipsum dolor sit amet consectetur adipiscing elit. In rhoncus ipsum sed\
             lectus porta volutpat.",
        ));
        assert_eq!(builder.text_length(), 112);
        assert_eq!(builder.remaining_space(), 36);
    }

    #[test]
    fn test_separators_only_between_text() {
        let mut builder = TextPreChunkBuilder::new(50);

        builder.add_element(Element::text("abcde"));
        builder.add_element(Element::page_break());
        builder.add_element(Element::text("fghij"));

        assert_eq!(builder.text_length(), 12);
        assert_eq!(builder.remaining_space(), 36);
    }

    #[test]
    fn test_remaining_space_bottoms_out_at_zero() {
        let mut builder = TextPreChunkBuilder::new(10);
        builder.add_element(Element::text("a".repeat(25)));

        assert_eq!(builder.remaining_space(), 0);
    }

    #[test]
    fn test_flush_resets_builder() {
        let mut builder = TextPreChunkBuilder::new(150);
        builder.add_element(Element::title("Introduction"));
        builder.add_element(Element::text(
            "Lorem ipsum dolor sit amet consectetur adipiscing elit. In rhoncus ipsum sed\
             lectus porta volutpat.",
        ));

        let pre_chunk = builder.flush().unwrap();

        assert_eq!(pre_chunk.elements().len(), 2);
        assert_eq!(pre_chunk.text_length(), 112);
        assert!(builder.is_empty());
        assert_eq!(builder.text_length(), 0);
        assert_eq!(builder.remaining_space(), 150);
    }

    #[test]
    fn test_flush_of_empty_builder_yields_nothing() {
        let mut builder = TextPreChunkBuilder::new(150);
        assert!(builder.flush().is_none());
    }
}
