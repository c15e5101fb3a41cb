use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A review left against a catalogue entry. `book_id` ties the review to
/// its parent book and is required on every stored review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub book_id: String,
    pub message: String,
    pub user: Reviewer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ReviewLinks>,
}

/// The person who wrote a review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reviewer {
    #[serde(default)]
    pub forename: String,
    #[serde(default)]
    pub surname: String,
}

/// Relative hyperlinks attached to a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub book: String,
}

/// Request payload for creating or replacing a review.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Reviewer,
}

impl Review {
    /// Build a review against the given book, assigning a fresh identifier
    /// and the relative link set.
    pub fn new(book_id: &str, payload: NewReview) -> Self {
        let id = Uuid::now_v7().to_string();
        let links = ReviewLinks::for_review(book_id, &id);
        Self {
            id,
            book_id: book_id.to_string(),
            message: payload.message,
            user: payload.user,
            links: Some(links),
        }
    }

    /// Check review content in declared order: message presence, message
    /// length, then reviewer identity.
    pub fn validate(&self, max_message_length: usize) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if self.message.len() > max_message_length {
            return Err(ValidationError::MessageTooLong);
        }
        if self.user.forename.trim().is_empty() && self.user.surname.trim().is_empty() {
            return Err(ValidationError::EmptyUser);
        }
        Ok(())
    }

    /// Prefix all relative links with the resolved API version.
    pub fn prefix_links(&mut self, version: &str) {
        if let Some(links) = &mut self.links {
            links.self_link = format!("/{version}{}", links.self_link);
            links.book = format!("/{version}{}", links.book);
        }
    }
}

impl ReviewLinks {
    pub fn for_review(book_id: &str, review_id: &str) -> Self {
        Self {
            self_link: format!("/books/{book_id}/reviews/{review_id}"),
            book: format!("/books/{book_id}"),
        }
    }
}
