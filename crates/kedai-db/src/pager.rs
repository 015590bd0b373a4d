//! Offset/limit windowing and pagination metadata.

use kedai_core::{PageRequest, PaginationMeta};

/// SQL window for a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

/// Compute LIMIT/OFFSET for a validated page request.
pub fn window(req: PageRequest) -> PageWindow {
    PageWindow {
        limit: req.page_size,
        offset: (req.page - 1).saturating_mul(req.page_size),
    }
}

/// Compute page metadata from the filtered row count.
///
/// `total_pages` is 0 when nothing matches; a page past the end keeps its
/// requested number with `has_next = false`.
pub fn meta(total: i64, req: PageRequest) -> PaginationMeta {
    let total = total.max(0);
    let total_pages = if req.page_size > 0 {
        (total + req.page_size - 1) / req.page_size
    } else {
        0
    };
    PaginationMeta {
        total,
        page: req.page,
        page_size: req.page_size,
        total_pages,
        has_next: req.page < total_pages,
        has_previous: req.page > 1,
    }
}
