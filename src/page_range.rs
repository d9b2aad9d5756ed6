use std::fmt;

/// A contiguous, half-open run of 0-based page indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGroup {
    pub start: u32,
    pub end: u32,
}

impl PageGroup {
    /// The `index`-th group when pages are cut into runs of `pages_per_doc`
    pub fn nth(index: u32, pages_per_doc: u32) -> Self {
        let start = index * pages_per_doc;
        PageGroup {
            start,
            end: start + pages_per_doc,
        }
    }

    /// First page, 1-based
    pub fn first_page(&self) -> u32 {
        self.start + 1
    }

    /// Last page, 1-based and inclusive
    pub fn last_page(&self) -> u32 {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Expand into the 1-based page numbers lopdf addresses pages by
    pub fn page_numbers(&self) -> Vec<u32> {
        (self.first_page()..=self.last_page()).collect()
    }
}

impl fmt::Display for PageGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first_page(), self.last_page())
    }
}

/// Number of whole groups that fit, capped at `wanted`.
/// Trailing pages that do not fill a group are left out.
pub fn whole_groups(total_pages: u32, pages_per_doc: u32, wanted: usize) -> usize {
    if pages_per_doc == 0 {
        return 0;
    }
    wanted.min((total_pages / pages_per_doc) as usize)
}
