/// Length of `text` in characters
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cursor over consecutive windows of at most `maxlen` characters
///
/// Windows never split a character, and concatenating every window yields
/// the original text. As an iterator it produces at least one window, so
/// empty text comes back as a single empty window.
#[derive(Debug, Clone)]
pub(crate) struct TextWindows {
    text: String,
    /// Byte offset of the next window
    offset: usize,
    maxlen: usize,
    started: bool,
}

impl TextWindows {
    pub(crate) fn new(text: String, maxlen: usize) -> Self {
        Self {
            text,
            offset: 0,
            maxlen: maxlen.max(1),
            started: false,
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Take the next window, empty once the text is used up
    pub(crate) fn next_window(&mut self) -> String {
        self.started = true;

        let rest = &self.text[self.offset..];
        let end = rest
            .char_indices()
            .nth(self.maxlen)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());

        let window = rest[..end].to_string();
        self.offset += end;
        window
    }
}

impl Iterator for TextWindows {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.started && self.is_exhausted() {
            return None;
        }
        Some(self.next_window())
    }
}
