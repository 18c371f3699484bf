//! Data models for folio
//!
//! Defines the core data structures: the reader's identity, a paginated
//! book, a reading session and the view a renderer gets for one page.
//!
//! Page numbers are integers everywhere in memory. The cache stores a book as
//! `{"<page>": "<text>"}` and bookmarks as an ordered list; the serde derives
//! below produce exactly that shape.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::paginate::Page;

/// Identifier of a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A paginated book
///
/// Pages are numbered densely from 1. Built once from the source text and
/// never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book {
    pages: BTreeMap<u32, String>,
}

impl Book {
    /// Build a book from paginator output
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|page| (page.number, page.text))
                .collect(),
        }
    }

    /// Text of a page, `None` when out of range
    pub fn page(&self, number: u32) -> Option<&str> {
        self.pages.get(&number).map(String::as_str)
    }

    pub fn contains(&self, number: u32) -> bool {
        self.pages.contains_key(&number)
    }

    pub fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate pages in order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.pages.iter().map(|(n, text)| (*n, text.as_str()))
    }
}

impl From<BTreeMap<u32, String>> for Book {
    fn from(pages: BTreeMap<u32, String>) -> Self {
        Self { pages }
    }
}

/// Per-user reading state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Current page, never below 1
    #[serde(default = "first_page")]
    pub page: u32,
    /// Bookmarked pages
    #[serde(default)]
    pub bookmarks: BTreeSet<u32>,
}

impl Default for UserSession {
    fn default() -> Self {
        Self {
            page: first_page(),
            bookmarks: BTreeSet::new(),
        }
    }
}

fn first_page() -> u32 {
    1
}

/// Direction of a page turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Apply this turn to `page`, staying within `1..=last_page`
    ///
    /// Returns `None` when the turn would leave the book. A `page` past the
    /// end (the book got shorter) turns back onto `last_page`.
    pub fn apply(self, page: u32, last_page: u32) -> Option<u32> {
        match self {
            Direction::Forward => page.checked_add(1).filter(|next| *next <= last_page),
            Direction::Backward => page
                .min(last_page.saturating_add(1))
                .checked_sub(1)
                .filter(|prev| *prev >= 1),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "next" => Ok(Direction::Forward),
            "backward" | "back" | "prev" => Ok(Direction::Backward),
            other => Err(format!("Unknown direction: '{}'", other)),
        }
    }
}

/// What a renderer needs to show one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub page: u32,
    pub total: u32,
    pub text: String,
}

impl PageView {
    /// `"<page>/<total>"`, the label of the middle pagination button
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.page, self.total)
    }
}

/// A bookmark with the text of the page it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkEntry {
    pub page: u32,
    pub text: String,
}
