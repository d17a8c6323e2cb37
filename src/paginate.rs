// Fixed-size page windows over an ordered result

use serde::Serialize;

/// One page of an ordered result. `current_page` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Number of items across all pages
    pub total: usize,
}

/// `max(1, ceil(count / page_size))`
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested 1-indexed page into `1..=total_pages`
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size))
}

/// Slice out one page. A page past the end clamps to the last page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let current_page = clamp_page(page, items.len(), page_size);
    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        current_page,
        total_pages: total_pages(items.len(), page_size),
        total: items.len(),
    }
}
