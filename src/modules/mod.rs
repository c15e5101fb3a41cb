pub mod books;

use books_kernel::ModuleRegistry;

use crate::state::AppState;

/// Register all API modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: AppState) {
    registry.register(books::create_module(state));
}
