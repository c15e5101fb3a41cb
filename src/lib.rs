//! Books API Application Library
//!
//! Application modules and shared state for the books API service.

pub mod modules;
pub mod state;

/// Re-export commonly used types
pub use state::AppState;
