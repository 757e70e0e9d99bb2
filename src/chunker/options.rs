use serde::{Deserialize, Serialize};

use super::error::{ChunkingError, Result};

/// Hard cap on chunk text length when none is configured
pub const DEFAULT_MAX_CHARACTERS: usize = 500;

/// Validated chunking configuration
///
/// Only obtainable through [`ChunkingOptionsBuilder::build`] (or `Default`),
/// so every value held here has already passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkingOptions {
    max_characters: usize,
    new_after_n_chars: usize,
    combine_text_under_n_chars: usize,
    multipage_sections: bool,
}

impl ChunkingOptions {
    pub fn builder() -> ChunkingOptionsBuilder {
        ChunkingOptionsBuilder::new()
    }

    /// Hard maximum on the text length of any chunk
    pub fn max_characters(&self) -> usize {
        self.max_characters
    }

    /// Soft maximum; a pre-chunk is closed once it reaches this length
    pub fn new_after_n_chars(&self) -> usize {
        self.new_after_n_chars
    }

    /// Pre-chunks shorter than this are combined with the ones that follow
    pub fn combine_text_under_n_chars(&self) -> usize {
        self.combine_text_under_n_chars
    }

    /// Whether sections may span page boundaries
    pub fn multipage_sections(&self) -> bool {
        self.multipage_sections
    }
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_characters: DEFAULT_MAX_CHARACTERS,
            new_after_n_chars: DEFAULT_MAX_CHARACTERS,
            combine_text_under_n_chars: DEFAULT_MAX_CHARACTERS,
            multipage_sections: true,
        }
    }
}

/// Raw, unvalidated chunking options
///
/// Values are signed so out-of-range input from a config file or the command
/// line can be reported back as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkingOptionsBuilder {
    max_characters: Option<i64>,
    new_after_n_chars: Option<i64>,
    combine_text_under_n_chars: Option<i64>,
    multipage_sections: Option<bool>,
}

impl ChunkingOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_characters(mut self, n: i64) -> Self {
        self.max_characters = Some(n);
        self
    }

    pub fn new_after_n_chars(mut self, n: i64) -> Self {
        self.new_after_n_chars = Some(n);
        self
    }

    pub fn combine_text_under_n_chars(mut self, n: i64) -> Self {
        self.combine_text_under_n_chars = Some(n);
        self
    }

    pub fn multipage_sections(mut self, multipage: bool) -> Self {
        self.multipage_sections = Some(multipage);
        self
    }

    /// Take every value set in `overrides`, keeping ours for the rest
    pub fn merge(self, overrides: ChunkingOptionsBuilder) -> Self {
        Self {
            max_characters: overrides.max_characters.or(self.max_characters),
            new_after_n_chars: overrides.new_after_n_chars.or(self.new_after_n_chars),
            combine_text_under_n_chars: overrides
                .combine_text_under_n_chars
                .or(self.combine_text_under_n_chars),
            multipage_sections: overrides.multipage_sections.or(self.multipage_sections),
        }
    }

    /// Validate and resolve defaults
    ///
    /// Both soft thresholds default to, and are capped at, `max_characters`.
    /// `combine_text_under_n_chars` is further capped at the resolved
    /// `new_after_n_chars`.
    pub fn build(&self) -> Result<ChunkingOptions> {
        let max_characters = self
            .max_characters
            .unwrap_or(DEFAULT_MAX_CHARACTERS as i64);
        if max_characters <= 0 {
            return Err(ChunkingError::invalid_argument(
                "max_characters",
                "> 0",
                max_characters,
            ));
        }

        let combine_text_under_n_chars = resolve_soft_limit(
            "combine_text_under_n_chars",
            self.combine_text_under_n_chars,
            max_characters,
        )?;
        let new_after_n_chars =
            resolve_soft_limit("new_after_n_chars", self.new_after_n_chars, max_characters)?;

        Ok(ChunkingOptions {
            max_characters: to_usize(max_characters),
            new_after_n_chars: to_usize(new_after_n_chars),
            combine_text_under_n_chars: to_usize(
                combine_text_under_n_chars.min(new_after_n_chars),
            ),
            multipage_sections: self.multipage_sections.unwrap_or(true),
        })
    }
}

fn resolve_soft_limit(name: &'static str, value: Option<i64>, max_characters: i64) -> Result<i64> {
    match value {
        None => Ok(max_characters),
        Some(n) if n < 0 => Err(ChunkingError::invalid_argument(name, ">= 0", n)),
        Some(n) => Ok(n.min(max_characters)),
    }
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
