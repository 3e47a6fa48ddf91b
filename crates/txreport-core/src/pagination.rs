//! Page arithmetic and first/prev/next/last navigation

use serde::{Deserialize, Serialize};

/// Number of pages needed for `count` items, never less than one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Index range of a page, clipped to `count`. Empty when out of range.
pub fn page_bounds(count: usize, page_size: usize, page_index: usize) -> std::ops::Range<usize> {
    let start = page_index.saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// Pagination control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
}

impl PageNav {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageNav::First => "first",
            PageNav::Prev => "prev",
            PageNav::Next => "next",
            PageNav::Last => "last",
        }
    }
}

impl std::str::FromStr for PageNav {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(PageNav::First),
            "prev" | "previous" => Ok(PageNav::Prev),
            "next" => Ok(PageNav::Next),
            "last" => Ok(PageNav::Last),
            _ => Err(format!("Invalid page navigation: {}", s)),
        }
    }
}

/// State of the pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageControls {
    /// Total number of items
    pub length: usize,
    pub page_size: usize,
    /// Zero-based current page
    pub page_index: usize,
}

impl PageControls {
    pub fn new(length: usize, page_size: usize, page_index: usize) -> Self {
        Self { length, page_size, page_index }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.length, self.page_size)
    }

    pub fn last_index(&self) -> usize {
        self.total_pages() - 1
    }

    pub fn can_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index < self.last_index()
    }

    /// Page to move to for `nav`, or `None` when the action changes nothing
    pub fn target(&self, nav: PageNav) -> Option<usize> {
        match nav {
            PageNav::First => (self.page_index != 0).then_some(0),
            PageNav::Prev => self.can_prev().then(|| self.page_index - 1),
            PageNav::Next => self.can_next().then(|| self.page_index + 1),
            PageNav::Last => {
                let last = self.last_index();
                (self.page_index != last).then_some(last)
            }
        }
    }
}
