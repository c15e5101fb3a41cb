//! HTTP server facade for the books API with Axum, error handling, and
//! OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};

use books_kernel::ModuleRegistry;

pub mod error;
pub mod health;
pub mod pagination;
pub mod response;
pub mod router;
pub mod version;

pub use error::ApiError;
pub use pagination::Paginator;
pub use version::ApiVersions;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &books_kernel::settings::Settings,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &books_kernel::settings::Settings,
) -> Router {
    let mut router_builder = RouterBuilder::new();

    // Health check route
    router_builder = router_builder.route("/health", get(health::health_check));

    // Collect module routes into one API router, mounted versioned and
    // unversioned.
    let mut api = Router::new();
    for module in registry.modules() {
        tracing::info!(module = module.name(), "mounting module routes");
        api = api.merge(module.routes());
    }
    router_builder = router_builder.mount_api(api);

    // OpenAPI documentation
    router_builder = router_builder.with_openapi(registry);

    // Global middlewares wrap everything registered above.
    router_builder = router_builder
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    router_builder.build()
}
