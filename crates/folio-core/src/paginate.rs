//! Text pagination
//!
//! Splits a text blob into pages of at most `page_size` characters, preferring
//! to break right after punctuation so a page does not end mid-sentence.
//!
//! Lengths are counted in characters (Unicode scalar values), never bytes, so
//! Cyrillic or accented text paginates the same way ASCII does.
//!
//! For each page, starting from a cursor at 0:
//!
//! 1. If what remains fits in one page, it becomes the last page.
//! 2. If the character right after the window is `.` and the window's last
//!    character is an end sign (an `X.Y.` run straddling the boundary), the
//!    window is pulled back by two characters.
//! 3. The window is cut right after its last end sign. A window without any
//!    end sign is taken whole.
//! 4. The page text is the consumed span with surrounding whitespace trimmed;
//!    the cursor advances by the untrimmed span length.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{ReaderError, ReaderResult};

/// Default page size, in characters
pub const DEFAULT_PAGE_SIZE: usize = 750;

/// Characters that may end a page
pub const DEFAULT_END_SIGNS: &str = ",.!:;?";

/// A single page produced by the [`Paginator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    /// Page text with surrounding whitespace trimmed
    pub text: String,
    /// Character range of the source consumed by this page (untrimmed)
    pub span: Range<usize>,
}

/// Boundary-aware text splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    end_signs: Vec<char>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            end_signs: DEFAULT_END_SIGNS.chars().collect(),
        }
    }
}

impl Paginator {
    /// Create a paginator with a page size and a set of end signs
    pub fn new(page_size: usize, end_signs: &str) -> ReaderResult<Self> {
        if page_size == 0 {
            return Err(ReaderError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            end_signs: end_signs.chars().collect(),
        })
    }

    /// Maximum characters per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Split `text` into numbered pages
    pub fn pages(&self, text: &str) -> Vec<Page> {
        let chars: Vec<char> = text.chars().collect();
        // Byte offset of every char boundary, including the end of the text
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut pages = Vec::new();
        let mut start = 0;
        let mut number = 1;

        while start < chars.len() {
            let consumed = self.span_len(&chars, start);
            let end = start + consumed;
            pages.push(Page {
                number,
                text: text[offsets[start]..offsets[end]].trim().to_string(),
                span: start..end,
            });
            start = end;
            number += 1;
        }

        pages
    }

    /// Split `text` into a page-number → page-text mapping
    pub fn paginate(&self, text: &str) -> BTreeMap<u32, String> {
        self.pages(text)
            .into_iter()
            .map(|page| (page.number, page.text))
            .collect()
    }

    /// Number of characters the page starting at `start` consumes
    ///
    /// Always at least 1 while `start` is inside the text.
    fn span_len(&self, chars: &[char], start: usize) -> usize {
        let remaining = chars.len() - start;
        if remaining <= self.page_size {
            return remaining;
        }

        let mut size = self.page_size;
        if size > 2
            && chars[start + size] == '.'
            && self.is_end_sign(chars[start + size - 1])
        {
            size -= 2;
        }

        chars[start..start + size]
            .iter()
            .rposition(|&c| self.is_end_sign(c))
            .map_or(size, |i| i + 1)
    }

    fn is_end_sign(&self, c: char) -> bool {
        self.end_signs.contains(&c)
    }
}
