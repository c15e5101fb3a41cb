//! Persistence boundary for the books API.
//!
//! The API core talks to a [`DataStore`] trait object and never to a
//! concrete database client. [`MemoryDataStore`] backs local runs;
//! [`mock::MockDataStore`] backs handler tests and records every call it
//! receives.

pub mod memory;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use books_domain::{Book, NewReview, Review};

/// Errors surfaced by a datastore implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book not found")]
    BookNotFound,

    #[error("review not found")]
    ReviewNotFound,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence operations consumed by the request handlers.
///
/// List operations return the materialized slice together with the total
/// number of items matching the query. Updates take the replacement
/// content only; the stored review keeps its identity and links.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn add_book(&self, book: &Book) -> Result<(), StoreError>;

    async fn get_book(&self, id: &str) -> Result<Book, StoreError>;

    async fn get_books(&self, offset: usize, limit: usize)
        -> Result<(Vec<Book>, usize), StoreError>;

    async fn add_review(&self, review: &Review) -> Result<(), StoreError>;

    async fn get_review(&self, id: &str) -> Result<Review, StoreError>;

    async fn get_reviews(
        &self,
        book_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Review>, usize), StoreError>;

    async fn update_review(
        &self,
        review_id: &str,
        replacement: &NewReview,
    ) -> Result<(), StoreError>;
}

pub use memory::MemoryDataStore;

/// Materialize one page of a result set, returning the slice and the total.
pub(crate) fn slice_page<T: Clone>(items: &[T], offset: usize, limit: usize) -> (Vec<T>, usize) {
    let total = items.len();
    let start = offset.min(total);
    let end = start.saturating_add(limit).min(total);
    (items[start..end].to_vec(), total)
}
