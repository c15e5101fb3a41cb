use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A catalogue entry. The identifier is assigned at construction and never
/// changes; links are stored relative and prefixed with the active API
/// version when a response is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub checked_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<BookLinks>,
}

/// Relative hyperlinks attached to a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub reviews: String,
    pub reservations: String,
}

/// Request payload for creating a book. Missing fields decode to empty
/// strings so validation can report them by name.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

impl Book {
    /// Build a book from an incoming payload, assigning a fresh identifier
    /// and the relative link set.
    pub fn new(payload: NewBook) -> Self {
        let id = Uuid::now_v7().to_string();
        let links = BookLinks::for_book(&id);
        Self {
            id,
            title: payload.title,
            author: payload.author,
            checked_out: false,
            links: Some(links),
        }
    }

    /// Check required fields in declared order: title, then author.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing("title"));
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing("author"));
        }
        Ok(())
    }

    /// Prefix all relative links with the resolved API version.
    pub fn prefix_links(&mut self, version: &str) {
        if let Some(links) = &mut self.links {
            links.self_link = format!("/{version}{}", links.self_link);
            links.reviews = format!("/{version}{}", links.reviews);
            links.reservations = format!("/{version}{}", links.reservations);
        }
    }
}

impl BookLinks {
    pub fn for_book(id: &str) -> Self {
        Self {
            self_link: format!("/books/{id}"),
            reviews: format!("/books/{id}/reviews"),
            reservations: format!("/books/{id}/reservations"),
        }
    }
}
