use std::sync::RwLock;

use async_trait::async_trait;

use books_domain::{Book, NewReview, Review};

use crate::{slice_page, DataStore, StoreError};

/// In-memory datastore backing local runs. Items keep insertion order so
/// paginated listings are stable.
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    books: RwLock<Vec<Book>>,
    reviews: RwLock<Vec<Review>>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn add_book(&self, book: &Book) -> Result<(), StoreError> {
        self.books.write().unwrap().push(book.clone());
        Ok(())
    }

    async fn get_book(&self, id: &str) -> Result<Book, StoreError> {
        self.books
            .read()
            .unwrap()
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(StoreError::BookNotFound)
    }

    async fn get_books(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Book>, usize), StoreError> {
        let books = self.books.read().unwrap();
        Ok(slice_page(&books, offset, limit))
    }

    async fn add_review(&self, review: &Review) -> Result<(), StoreError> {
        self.reviews.write().unwrap().push(review.clone());
        Ok(())
    }

    async fn get_review(&self, id: &str) -> Result<Review, StoreError> {
        self.reviews
            .read()
            .unwrap()
            .iter()
            .find(|review| review.id == id)
            .cloned()
            .ok_or(StoreError::ReviewNotFound)
    }

    async fn get_reviews(
        &self,
        book_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Review>, usize), StoreError> {
        let reviews = self.reviews.read().unwrap();
        let matching: Vec<Review> = reviews
            .iter()
            .filter(|review| review.book_id == book_id)
            .cloned()
            .collect();
        Ok(slice_page(&matching, offset, limit))
    }

    async fn update_review(
        &self,
        review_id: &str,
        replacement: &NewReview,
    ) -> Result<(), StoreError> {
        let mut reviews = self.reviews.write().unwrap();
        let review = reviews
            .iter_mut()
            .find(|review| review.id == review_id)
            .ok_or(StoreError::ReviewNotFound)?;

        // Full replace of the user-supplied content; identity and links stay.
        review.message = replacement.message.clone();
        review.user = replacement.user.clone();
        Ok(())
    }
}
