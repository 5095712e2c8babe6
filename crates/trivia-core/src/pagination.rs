//! Fixed-size page slicing over ordered result sets.

use serde::Serialize;

/// Default number of questions per page.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// Return the 1-based `page` of `items`, at most `page_size` long.
///
/// Pages past the end (and page 0) are empty. Order is preserved.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = match (page - 1).checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// One page of a selection plus the size of the whole selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `page` out of `items`, remembering how many items there were.
    pub fn of(items: &[T], page: usize, page_size: usize) -> Self {
        Self {
            items: paginate(items, page, page_size).to_vec(),
            total: items.len(),
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
