use std::sync::Arc;

use books_http::{ApiVersions, Paginator};
use books_kernel::settings::ApiSettings;
use books_store::DataStore;

/// Shared state handed to every handler: the persistence collaborator plus
/// the immutable contract configuration. Handlers keep nothing between
/// requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub versions: Arc<ApiVersions>,
    pub paginator: Paginator,
    pub max_review_length: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, api: &ApiSettings) -> Self {
        Self {
            store,
            versions: Arc::new(ApiVersions::from_settings(api)),
            paginator: Paginator::from_settings(api),
            max_review_length: api.max_review_length,
        }
    }
}
