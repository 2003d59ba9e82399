use crate::renderer::PaginationControls;

/// Current and total page of a paginated listing.
///
/// Starts at 1/1 and is only ever moved by [`PageState::settle`] after a
/// successful response, so `1 <= current <= total` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    current: u32,
    total: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
        }
    }
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Build the state a response for `page` reported. Returns `None` when
    /// the pair is inconsistent (page 0, or a page past the reported total).
    pub fn settle(page: u32, total_pages: u32) -> Option<Self> {
        if page == 0 || total_pages < page {
            return None;
        }
        Some(Self {
            current: page,
            total: total_pages,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    pub fn controls(&self) -> PaginationControls {
        PaginationControls {
            current: self.current,
            total: self.total,
            previous_enabled: self.has_previous(),
            next_enabled: self.has_next(),
        }
    }
}
