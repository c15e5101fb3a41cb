//! Pagination parameter resolution
//!
//! Derives `(offset, limit)` from raw query strings, enforcing the
//! configured bounds. Pure; the caller decides what to do with the values.

use books_kernel::settings::ApiSettings;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    default_limit: usize,
    max_limit: usize,
}

impl Paginator {
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    pub fn from_settings(api: &ApiSettings) -> Self {
        Self::new(api.default_limit, api.max_limit)
    }

    /// Resolve raw `offset`/`limit` query parameters.
    ///
    /// Absent offset defaults to 0; absent limit defaults to the configured
    /// default. Non-numeric values, negative offsets, and limits over the
    /// configured maximum each fail with their own error kind.
    pub fn resolve(
        &self,
        offset: Option<&str>,
        limit: Option<&str>,
    ) -> Result<(usize, usize), ApiError> {
        let offset = match offset {
            None | Some("") => 0,
            Some(raw) => {
                let parsed: i64 = raw.parse().map_err(|_| ApiError::InvalidOffsetParameter)?;
                if parsed < 0 {
                    return Err(ApiError::InvalidOffset);
                }
                parsed as usize
            }
        };

        let limit = match limit {
            None | Some("") => self.default_limit,
            Some(raw) => {
                let parsed: i64 = raw.parse().map_err(|_| ApiError::InvalidLimitParameter)?;
                if parsed < 0 {
                    return Err(ApiError::InvalidLimitParameter);
                }
                parsed as usize
            }
        };

        if limit > self.max_limit {
            return Err(ApiError::LimitExceeded {
                max: self.max_limit,
            });
        }

        Ok((offset, limit))
    }
}
