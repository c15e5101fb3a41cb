mod books;
mod reviews;

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use books_http::ApiError;
use books_kernel::{InitCtx, Module};
use serde_json::json;

use crate::state::AppState;

/// Resolve the version path token against the configured set. Requests on
/// the unversioned mount carry no token and resolve to the default.
fn resolve_version(state: &AppState, vars: &HashMap<String, String>) -> Result<String, ApiError> {
    state.versions.resolve(vars.get("version").map(String::as_str))
}

/// Path variable by name, or "" when the route did not capture it. Used to
/// record request context on the handler span before resolution can fail.
fn path_var<'a>(vars: &'a HashMap<String, String>, name: &str) -> &'a str {
    vars.get(name).map_or("", String::as_str)
}

/// Fetch a required, non-empty path variable.
fn require_var<'a>(
    vars: &'a HashMap<String, String>,
    name: &str,
    missing: ApiError,
) -> Result<&'a str, ApiError> {
    match vars.get(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(missing),
    }
}

/// Catalogue module: books and their reviews.
pub struct BooksModule {
    state: AppState,
}

impl BooksModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", post(books::add_book).get(books::get_books))
            .route("/books/{id}", get(books::get_book))
            .route(
                "/books/{id}/reviews",
                post(reviews::add_review).get(reviews::get_reviews),
            )
            .route(
                "/books/{id}/reviews/{review_id}",
                get(reviews::get_review).put(reviews::update_review),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/books": {
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": { "description": "Invalid book payload" }
                        }
                    },
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "offset", "in": "query", "schema": { "type": "integer" } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Paginated list of books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BooksPage" }
                                    }
                                }
                            },
                            "400": { "description": "Invalid pagination parameters" }
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": { "description": "Book not found" }
                        }
                    }
                },
                "/books/{id}/reviews": {
                    "post": {
                        "summary": "Add a review to a book",
                        "tags": ["Reviews"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "201": {
                                "description": "Created review",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Review" }
                                    }
                                }
                            },
                            "400": { "description": "Invalid review payload" },
                            "404": { "description": "Book not found" }
                        }
                    },
                    "get": {
                        "summary": "List reviews of a book",
                        "tags": ["Reviews"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                            { "name": "offset", "in": "query", "schema": { "type": "integer" } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Paginated list of reviews",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ReviewsPage" }
                                    }
                                }
                            },
                            "404": { "description": "Book not found" }
                        }
                    }
                },
                "/books/{id}/reviews/{review_id}": {
                    "get": {
                        "summary": "Get a review",
                        "tags": ["Reviews"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                            { "name": "review_id", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "The review",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Review" }
                                    }
                                }
                            },
                            "404": { "description": "Book or review not found" }
                        }
                    },
                    "put": {
                        "summary": "Replace a review",
                        "tags": ["Reviews"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                            { "name": "review_id", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": { "description": "Review replaced; response has headers only" },
                            "404": { "description": "Book or review not found" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "checked_out": { "type": "boolean" },
                            "links": {
                                "type": "object",
                                "properties": {
                                    "self": { "type": "string" },
                                    "reviews": { "type": "string" },
                                    "reservations": { "type": "string" }
                                }
                            }
                        },
                        "required": ["id", "title", "author"]
                    },
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "book_id": { "type": "string" },
                            "message": { "type": "string" },
                            "user": {
                                "type": "object",
                                "properties": {
                                    "forename": { "type": "string" },
                                    "surname": { "type": "string" }
                                }
                            },
                            "links": {
                                "type": "object",
                                "properties": {
                                    "self": { "type": "string" },
                                    "book": { "type": "string" }
                                }
                            }
                        },
                        "required": ["id", "book_id", "message", "user"]
                    },
                    "BooksPage": {
                        "type": "object",
                        "properties": {
                            "items": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            },
                            "count": { "type": "integer" },
                            "offset": { "type": "integer" },
                            "limit": { "type": "integer" },
                            "total_count": { "type": "integer" }
                        }
                    },
                    "ReviewsPage": {
                        "type": "object",
                        "properties": {
                            "items": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Review" }
                            },
                            "count": { "type": "integer" },
                            "offset": { "type": "integer" },
                            "limit": { "type": "integer" },
                            "total_count": { "type": "integer" }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(state))
}
