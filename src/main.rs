mod modules;
mod state;

use std::sync::Arc;

use anyhow::Context;
use books_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use books_store::MemoryDataStore;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load books API settings")?;

    books_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        default_version = %settings.api.default_version,
        "books-api bootstrap starting"
    );

    let store = Arc::new(MemoryDataStore::new());
    let app_state = AppState::new(store, &settings.api);

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, app_state);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    books_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
