use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
};

use books_domain::{NewReview, Paged, Review};
use books_http::{
    response::{require_body, versioned_empty, versioned_json},
    ApiError,
};

use crate::state::AppState;

use super::{path_var, require_var, resolve_version};

fn decode_review(body: &Bytes) -> Result<NewReview, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidReview)
}

/// POST /books/{id}/reviews
#[tracing::instrument(
    skip_all,
    fields(
        requested_api_version = tracing::field::Empty,
        book_id = tracing::field::Empty,
    )
)]
pub(super) async fn add_review(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("requested_api_version", path_var(&vars, "version"));
    span.record("book_id", path_var(&vars, "id"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;
        let book_id = require_var(&vars, "id", ApiError::EmptyBookId)?;

        let body = require_body(body)?;

        // A review cannot be added unless its book exists.
        state.store.get_book(book_id).await?;

        let payload = decode_review(&body)?;

        let mut review = Review::new(book_id, payload);
        review.validate(state.max_review_length)?;

        state.store.add_review(&review).await?;

        tracing::info!(%version, book_id = %book_id, review_id = %review.id, "successfully added review");

        review.prefix_links(&version);
        versioned_json(StatusCode::CREATED, &version, &review)
    }
    .await;

    result.map_err(ApiError::logged)
}

/// GET /books/{id}/reviews
#[tracing::instrument(
    skip_all,
    fields(
        requested_api_version = tracing::field::Empty,
        book_id = tracing::field::Empty,
        offset = tracing::field::Empty,
        limit = tracing::field::Empty,
    )
)]
pub(super) async fn get_reviews(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("requested_api_version", path_var(&vars, "version"));
    span.record("book_id", path_var(&vars, "id"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;

        let (offset, limit) = state.paginator.resolve(
            query.get("offset").map(String::as_str),
            query.get("limit").map(String::as_str),
        )?;
        span.record("offset", offset);
        span.record("limit", limit);

        let book_id = require_var(&vars, "id", ApiError::EmptyBookId)?;

        // Skip the review query when the book itself is unknown.
        state.store.get_book(book_id).await?;

        let (mut reviews, total_count) = state.store.get_reviews(book_id, offset, limit).await?;

        for review in &mut reviews {
            review.prefix_links(&version);
        }

        let response = Paged::new(reviews, offset, limit, total_count);

        tracing::info!(%version, book_id = %book_id, offset, limit, "successfully retrieved reviews");

        versioned_json(StatusCode::OK, &version, &response)
    }
    .await;

    result.map_err(ApiError::logged)
}

/// GET /books/{id}/reviews/{review_id}
#[tracing::instrument(
    skip_all,
    fields(
        requested_api_version = tracing::field::Empty,
        book_id = tracing::field::Empty,
        review_id = tracing::field::Empty,
    )
)]
pub(super) async fn get_review(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("requested_api_version", path_var(&vars, "version"));
    span.record("book_id", path_var(&vars, "id"));
    span.record("review_id", path_var(&vars, "review_id"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;
        let book_id = require_var(&vars, "id", ApiError::EmptyBookId)?;
        let review_id = require_var(&vars, "review_id", ApiError::EmptyReviewId)?;

        state.store.get_book(book_id).await?;

        let mut review = state.store.get_review(review_id).await?;
        review.prefix_links(&version);

        tracing::info!(%version, book_id = %book_id, review_id = %review_id, "successfully retrieved review");

        versioned_json(StatusCode::OK, &version, &review)
    }
    .await;

    result.map_err(ApiError::logged)
}

/// PUT /books/{id}/reviews/{review_id}
#[tracing::instrument(
    skip_all,
    fields(
        requested_api_version = tracing::field::Empty,
        book_id = tracing::field::Empty,
        review_id = tracing::field::Empty,
    )
)]
pub(super) async fn update_review(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("requested_api_version", path_var(&vars, "version"));
    span.record("book_id", path_var(&vars, "id"));
    span.record("review_id", path_var(&vars, "review_id"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;
        let book_id = require_var(&vars, "id", ApiError::EmptyBookId)?;
        let review_id = require_var(&vars, "review_id", ApiError::EmptyReviewId)?;

        // Both the book and the review must exist before replacing content.
        state.store.get_book(book_id).await?;
        state.store.get_review(review_id).await?;

        let body = body.map_err(|_| ApiError::UnreadableBody)?;

        // The replacement is content only; the stored review keeps its
        // identity and links.
        let replacement = decode_review(&body)?;
        state.store.update_review(review_id, &replacement).await?;

        tracing::info!(%version, book_id = %book_id, review_id = %review_id, "successfully updated review");

        Ok(versioned_empty(StatusCode::OK, &version))
    }
    .await;

    result.map_err(ApiError::logged)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use pretty_assertions::assert_eq;
    use tower::util::ServiceExt;

    use books_domain::{Book, NewBook, NewReview, Review, Reviewer};
    use books_store::mock::MockDataStore;

    use super::super::testutil::test_app;

    fn persisted_book() -> Book {
        Book::new(NewBook {
            title: "Small Island".to_string(),
            author: "Andrea Levy".to_string(),
        })
    }

    fn persisted_review(book_id: &str) -> Review {
        Review::new(
            book_id,
            NewReview {
                message: "Unforgettable.".to_string(),
                user: Reviewer {
                    forename: "Sam".to_string(),
                    surname: "Reader".to_string(),
                },
            },
        )
    }

    fn request(method: Method, uri: String, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const VALID_REVIEW: &str =
        r#"{"message":"A classic.","user":{"forename":"Sam","surname":"Reader"}}"#;

    #[tokio::test]
    async fn review_for_a_missing_book_is_rejected_before_any_review_work() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::POST,
                "/books/unknown/reviews".to_string(),
                VALID_REVIEW,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let calls = store.calls();
        assert_eq!(calls.get_book, vec!["unknown".to_string()]);
        assert_eq!(calls.add_review.len(), 0);
    }

    #[tokio::test]
    async fn valid_review_is_created_against_its_book() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::POST,
                format!("/books/{book_id}/reviews"),
                VALID_REVIEW,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let calls = store.calls();
        assert_eq!(calls.add_review.len(), 1);
        assert_eq!(calls.add_review[0].book_id, book_id);

        let json = body_json(response).await;
        assert_eq!(json["book_id"], book_id.as_str());
        assert_eq!(json["links"]["book"], format!("/v2/books/{book_id}"));
    }

    #[tokio::test]
    async fn review_with_empty_body_is_rejected() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::POST,
                format!("/books/{book_id}/reviews"),
                "",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().add_review.len(), 0);
    }

    #[tokio::test]
    async fn review_with_empty_message_is_rejected() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::POST,
                format!("/books/{book_id}/reviews"),
                r#"{"message":"","user":{"forename":"Sam","surname":"Reader"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().add_review.len(), 0);
    }

    #[tokio::test]
    async fn reviews_listing_wraps_items_in_the_envelope() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let review = persisted_review(&book_id);
        let review_id = review.id.clone();
        let store = MockDataStore::new().with_book(book).with_review(review);
        let app = test_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/books/{book_id}/reviews"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.calls().get_reviews,
            vec![(book_id.clone(), 0, 20)]
        );

        let json = body_json(response).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["total_count"], 1);
        assert_eq!(
            json["items"][0]["links"]["self"],
            format!("/v1/books/{book_id}/reviews/{review_id}")
        );
    }

    #[tokio::test]
    async fn missing_review_returns_not_found() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/books/{book_id}/reviews/absent"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.calls().get_review, vec!["absent".to_string()]);
    }

    #[tokio::test]
    async fn stored_review_is_returned_with_versioned_links() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let review = persisted_review(&book_id);
        let review_id = review.id.clone();
        let store = MockDataStore::new().with_book(book).with_review(review);
        let app = test_app(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/books/{book_id}/reviews/{review_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["id"], review_id.as_str());
        assert_eq!(json["links"]["book"], format!("/v2/books/{book_id}"));
    }

    #[tokio::test]
    async fn replacing_a_review_responds_with_headers_only() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let review = persisted_review(&book_id);
        let review_id = review.id.clone();
        let store = MockDataStore::new().with_book(book).with_review(review);
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::PUT,
                format!("/books/{book_id}/reviews/{review_id}"),
                r#"{"message":"Changed my mind.","user":{"forename":"Sam","surname":"Reader"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.books.v2+json; charset=utf-8"
        );

        let calls = store.calls();
        assert_eq!(calls.update_review.len(), 1);
        assert_eq!(calls.update_review[0].0, review_id);
        assert_eq!(calls.update_review[0].1.message, "Changed my mind.");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn replacing_a_missing_review_is_rejected_before_decoding() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::PUT,
                format!("/books/{book_id}/reviews/absent"),
                VALID_REVIEW,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.calls().update_review.len(), 0);
    }

    #[tokio::test]
    async fn replacing_with_an_undecodable_payload_is_rejected() {
        let book = persisted_book();
        let book_id = book.id.clone();
        let review = persisted_review(&book_id);
        let review_id = review.id.clone();
        let store = MockDataStore::new().with_book(book).with_review(review);
        let app = test_app(store.clone());

        let response = app
            .oneshot(request(
                Method::PUT,
                format!("/books/{book_id}/reviews/{review_id}"),
                "{not json",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().update_review.len(), 0);
    }
}
