/// Offset-based pagination parameters
///
/// # Example
/// ```
/// use action_link_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::new(50, 0);
/// let capped = PageRequest::new(10_000, 0).clamped(200);
/// assert_eq!(capped.limit, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items to return
    pub limit: usize,
    /// Number of items to skip
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Bounds `limit` to `1..=max_limit`
    pub fn clamped(self, max_limit: usize) -> Self {
        Self {
            limit: self.limit.clamp(1, max_limit.max(1)),
            offset: self.offset,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// One page of items and the size of the whole result set
///
/// # Example
/// ```
/// use action_link_db::repository::pagination::Page;
///
/// let page = Page::new(vec![1, 2, 3], 10, 3, 0);
/// assert!(page.is_first_page());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.offset == 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
