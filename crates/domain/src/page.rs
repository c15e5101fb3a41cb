use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
///
/// `count` is the number of items actually returned; `total_count` is the
/// number of items matching the query. `count <= limit` always holds, and
/// `offset + count <= total_count` whenever the full result set is
/// materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
    pub total_count: usize,
}

/// A list of items together with its pagination envelope. The page fields
/// are flattened next to `items` in the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub page: Page,
}

impl<T> Paged<T> {
    /// Wrap a materialized slice of the result set in its envelope.
    pub fn new(items: Vec<T>, offset: usize, limit: usize, total_count: usize) -> Self {
        let page = Page {
            count: items.len(),
            offset,
            limit,
            total_count,
        };
        Self { items, page }
    }
}
