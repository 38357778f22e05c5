//! Page arithmetic for a browsing session.
//!
//! The free functions are the pure rules.
//! [PaginationState] holds the values they operate on.

use std::num::NonZeroU32;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(6).unwrap();

/// Number of pages needed to show `total_count` items, never less than one.
pub fn total_pages(total_count: u64, page_size: NonZeroU32) -> u64 {
    total_count.div_ceil(u64::from(page_size.get())).max(1)
}

/// Number of items preceding `page`.
pub fn skip(page: NonZeroU32, page_size: NonZeroU32) -> u64 {
    u64::from(page.get() - 1) * u64::from(page_size.get())
}

/// Check a navigation target against the page count.
///
/// Returns `None` for targets outside `1..=total_pages`.
pub fn navigate(target: u32, total_pages: u64) -> Option<NonZeroU32> {
    let target = NonZeroU32::new(target)?;
    (u64::from(target.get()) <= total_pages).then_some(target)
}

/// "Next" requires a full last page and a later page to go to.
pub fn can_go_forward(
    current_page: NonZeroU32,
    total_pages: u64,
    page_size: NonZeroU32,
    last_page_len: usize,
) -> bool {
    last_page_len == page_size.get() as usize && u64::from(current_page.get()) < total_pages
}

pub fn can_go_back(current_page: NonZeroU32) -> bool {
    current_page.get() > 1
}

pub fn show_controls(total_pages: u64) -> bool {
    total_pages > 1
}

/// Pagination values of a session.
///
/// `page_size` is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    current_page: NonZeroU32,
    page_size: NonZeroU32,
    pub total_count: u64,
    /// Whether `total_count` is exact rather than an optimistic guess.
    pub is_authoritative: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            current_page: NonZeroU32::MIN,
            page_size,
            total_count: 0,
            is_authoritative: true,
        }
    }

    pub fn current_page(&self) -> NonZeroU32 {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: NonZeroU32) {
        self.current_page = page;
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count, self.page_size)
    }

    pub fn skip(&self) -> u64 {
        skip(self.current_page, self.page_size)
    }

    /// Move to `target` if it is a valid page.
    ///
    /// Returns the new page, or `None` without changing anything.
    pub fn navigate(&mut self, target: u32) -> Option<NonZeroU32> {
        let page = navigate(target, self.total_pages())?;
        self.current_page = page;
        Some(page)
    }

    /// Summarize which controls apply, given the length of the last page.
    pub fn controls(&self, last_page_len: usize) -> PageControls {
        let total_pages = self.total_pages();
        PageControls {
            current_page: self.current_page,
            total_pages,
            has_previous: can_go_back(self.current_page),
            has_next: can_go_forward(
                self.current_page,
                total_pages,
                self.page_size,
                last_page_len,
            ),
            visible: show_controls(total_pages),
        }
    }
}

/// What a pagination bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub current_page: NonZeroU32,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub visible: bool,
}
