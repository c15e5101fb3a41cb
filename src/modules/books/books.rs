use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
};

use books_domain::{Book, NewBook, Paged};
use books_http::{
    response::{read_json_body, require_body, versioned_json},
    ApiError,
};

use crate::state::AppState;

use super::{path_var, require_var, resolve_version};

/// POST /books
#[tracing::instrument(
    skip_all,
    fields(requested_api_version = tracing::field::Empty)
)]
pub(super) async fn add_book(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    tracing::Span::current().record("requested_api_version", path_var(&vars, "version"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;

        let body = require_body(body)?;
        let payload: NewBook = read_json_body(&body)?;

        let mut book = Book::new(payload);
        book.validate()?;

        state.store.add_book(&book).await?;

        tracing::info!(%version, book_id = %book.id, "successfully added book");

        book.prefix_links(&version);
        versioned_json(StatusCode::CREATED, &version, &book)
    }
    .await;

    result.map_err(ApiError::logged)
}

/// GET /books
#[tracing::instrument(
    skip_all,
    fields(
        requested_api_version = tracing::field::Empty,
        offset = tracing::field::Empty,
        limit = tracing::field::Empty,
    )
)]
pub(super) async fn get_books(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("requested_api_version", path_var(&vars, "version"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;

        let (offset, limit) = state.paginator.resolve(
            query.get("offset").map(String::as_str),
            query.get("limit").map(String::as_str),
        )?;
        span.record("offset", offset);
        span.record("limit", limit);

        let (mut books, total_count) = state.store.get_books(offset, limit).await?;

        for book in &mut books {
            book.prefix_links(&version);
        }

        let response = Paged::new(books, offset, limit, total_count);

        tracing::info!(%version, offset, limit, "successfully retrieved list of books");

        versioned_json(StatusCode::OK, &version, &response)
    }
    .await;

    result.map_err(ApiError::logged)
}

/// GET /books/{id}
#[tracing::instrument(
    skip_all,
    fields(
        requested_api_version = tracing::field::Empty,
        book_id = tracing::field::Empty,
    )
)]
pub(super) async fn get_book(
    State(state): State<AppState>,
    Path(vars): Path<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let span = tracing::Span::current();
    span.record("requested_api_version", path_var(&vars, "version"));
    span.record("book_id", path_var(&vars, "id"));

    let result: Result<Response, ApiError> = async {
        let version = resolve_version(&state, &vars)?;
        let id = require_var(&vars, "id", ApiError::EmptyBookId)?;

        let mut book = state.store.get_book(id).await?;
        book.prefix_links(&version);

        tracing::info!(%version, book_id = %id, "successfully retrieved book");

        versioned_json(StatusCode::OK, &version, &book)
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

    use books_domain::{Book, NewBook};
    use books_store::mock::MockDataStore;

    use super::super::testutil::test_app;

    fn persisted_book() -> Book {
        Book::new(NewBook {
            title: "Girl, Woman, Other".to_string(),
            author: "Bernardine Evaristo".to_string(),
        })
    }

    fn post_books(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/books")
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

    #[tokio::test]
    async fn add_book_with_no_body_is_rejected() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app.oneshot(post_books("")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().add_book.len(), 0);
    }

    #[tokio::test]
    async fn add_book_without_required_fields_is_rejected_before_persistence() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app.oneshot(post_books("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().add_book.len(), 0);
    }

    #[tokio::test]
    async fn add_book_with_valid_body_persists_once() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app
            .oneshot(post_books(
                r#"{"title":"Girl, Woman, Other","author":"Bernardine Evaristo"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.books.v2+json; charset=utf-8"
        );

        let calls = store.calls();
        assert_eq!(calls.add_book.len(), 1);
        assert_eq!(calls.add_book[0].title, "Girl, Woman, Other");

        let json = body_json(response).await;
        let id = json["id"].as_str().expect("created book carries an id");
        assert_eq!(json["links"]["self"], format!("/v2/books/{id}"));
    }

    #[tokio::test]
    async fn add_book_with_unparsable_json_is_rejected() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app.oneshot(post_books("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().add_book.len(), 0);
    }

    #[tokio::test]
    async fn get_book_returns_the_stored_book() {
        let book = persisted_book();
        let id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/books/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.calls().get_book, vec![id.clone()]);

        let json = body_json(response).await;
        assert_eq!(json["id"], id.as_str());
        assert_eq!(json["links"]["reviews"], format!("/v2/books/{id}/reviews"));
    }

    #[tokio::test]
    async fn get_missing_book_returns_not_found() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app
            .oneshot(Request::builder().uri("/books/3").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.calls().get_book.len(), 1);
    }

    #[tokio::test]
    async fn listing_an_empty_catalogue_returns_an_empty_page() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app
            .oneshot(Request::builder().uri("/books").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.calls().get_books, vec![(0, 20)]);

        let json = body_json(response).await;
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["count"], 0);
        assert_eq!(json["total_count"], 0);
    }

    #[tokio::test]
    async fn listing_echoes_pagination_and_rewrites_links_per_item() {
        let book = persisted_book();
        let id = book.id.clone();
        let store = MockDataStore::new().with_book(book);
        let app = test_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/books?offset=0&limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.books.v1+json; charset=utf-8"
        );
        assert_eq!(store.calls().get_books, vec![(0, 5)]);

        let json = body_json(response).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["offset"], 0);
        assert_eq!(json["limit"], 5);
        assert_eq!(json["items"][0]["links"]["self"], format!("/v1/books/{id}"));
    }

    #[tokio::test]
    async fn invalid_pagination_is_rejected_before_the_store_is_called() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/books?limit=ten")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls().get_books.len(), 0);
    }

    #[tokio::test]
    async fn unknown_version_is_rejected_with_the_valid_set() {
        let store = MockDataStore::new();
        let app = test_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v9/books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.calls().get_books.len(), 0);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("v1, v2"));
    }

    #[tokio::test]
    async fn backend_failures_are_reported_generically() {
        let store = MockDataStore::new().with_backend_failure();
        let app = test_app(store);

        let response = app
            .oneshot(Request::builder().uri("/books").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text, "internal server error");
    }
}
