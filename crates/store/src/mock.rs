//! Hand-written recording datastore for handler tests.
//!
//! Every call is captured with its arguments so tests can assert which
//! persistence operations ran. Seed data with [`MockDataStore::with_book`]
//! and [`MockDataStore::with_review`]; unseeded lookups report not-found.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use books_domain::{Book, NewReview, Review};

use crate::{slice_page, DataStore, StoreError};

/// Arguments captured per datastore method, in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordedCalls {
    pub add_book: Vec<Book>,
    pub get_book: Vec<String>,
    pub get_books: Vec<(usize, usize)>,
    pub add_review: Vec<Review>,
    pub get_review: Vec<String>,
    pub get_reviews: Vec<(String, usize, usize)>,
    pub update_review: Vec<(String, NewReview)>,
}

#[derive(Default)]
struct Inner {
    books: Mutex<Vec<Book>>,
    reviews: Mutex<Vec<Review>>,
    calls: Mutex<RecordedCalls>,
    backend_failure: Mutex<bool>,
}

/// Recording test double for [`DataStore`].
#[derive(Clone, Default)]
pub struct MockDataStore {
    inner: Arc<Inner>,
}

impl MockDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a book into the mock's backing data.
    pub fn with_book(self, book: Book) -> Self {
        self.inner.books.lock().unwrap().push(book);
        self
    }

    /// Seed a review into the mock's backing data.
    pub fn with_review(self, review: Review) -> Self {
        self.inner.reviews.lock().unwrap().push(review);
        self
    }

    /// Make every subsequent call fail with a backend error.
    pub fn with_backend_failure(self) -> Self {
        *self.inner.backend_failure.lock().unwrap() = true;
        self
    }

    /// Snapshot of all recorded calls.
    pub fn calls(&self) -> RecordedCalls {
        self.inner.calls.lock().unwrap().clone()
    }

    fn check_backend(&self) -> Result<(), StoreError> {
        if *self.inner.backend_failure.lock().unwrap() {
            return Err(StoreError::Backend(anyhow::anyhow!("store unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for MockDataStore {
    async fn add_book(&self, book: &Book) -> Result<(), StoreError> {
        self.inner.calls.lock().unwrap().add_book.push(book.clone());
        self.check_backend()?;
        self.inner.books.lock().unwrap().push(book.clone());
        Ok(())
    }

    async fn get_book(&self, id: &str) -> Result<Book, StoreError> {
        self.inner.calls.lock().unwrap().get_book.push(id.to_string());
        self.check_backend()?;
        self.inner
            .books
            .lock()
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
        self.inner.calls.lock().unwrap().get_books.push((offset, limit));
        self.check_backend()?;
        let books = self.inner.books.lock().unwrap();
        Ok(slice_page(&books, offset, limit))
    }

    async fn add_review(&self, review: &Review) -> Result<(), StoreError> {
        self.inner
            .calls
            .lock()
            .unwrap()
            .add_review
            .push(review.clone());
        self.check_backend()?;
        self.inner.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    async fn get_review(&self, id: &str) -> Result<Review, StoreError> {
        self.inner
            .calls
            .lock()
            .unwrap()
            .get_review
            .push(id.to_string());
        self.check_backend()?;
        self.inner
            .reviews
            .lock()
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
        self.inner
            .calls
            .lock()
            .unwrap()
            .get_reviews
            .push((book_id.to_string(), offset, limit));
        self.check_backend()?;
        let reviews = self.inner.reviews.lock().unwrap();
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
        self.inner
            .calls
            .lock()
            .unwrap()
            .update_review
            .push((review_id.to_string(), replacement.clone()));
        self.check_backend()?;
        let mut reviews = self.inner.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|review| review.id == review_id)
            .ok_or(StoreError::ReviewNotFound)?;
        review.message = replacement.message.clone();
        review.user = replacement.user.clone();
        Ok(())
    }
}
