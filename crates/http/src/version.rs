//! API version negotiation
//!
//! The valid set and the default are configuration, injected once at
//! startup; nothing here mutates after construction.

use books_kernel::settings::ApiSettings;

use crate::error::ApiError;

/// Immutable version configuration shared by every handler.
#[derive(Debug, Clone)]
pub struct ApiVersions {
    valid: Vec<String>,
    default: String,
}

impl ApiVersions {
    pub fn new(valid: Vec<String>, default: String) -> Self {
        Self { valid, default }
    }

    pub fn from_settings(api: &ApiSettings) -> Self {
        Self::new(api.valid_versions.clone(), api.default_version.clone())
    }

    /// Resolve a version token taken from the request path.
    ///
    /// A missing or empty token resolves to the configured default. A token
    /// outside the valid set fails, carrying that set for the error message.
    pub fn resolve(&self, requested: Option<&str>) -> Result<String, ApiError> {
        match requested {
            None | Some("") => Ok(self.default.clone()),
            Some(token) if self.valid.iter().any(|v| v == token) => Ok(token.to_string()),
            Some(_) => Err(ApiError::InvalidVersion {
                valid: self.valid.clone(),
            }),
        }
    }
}
