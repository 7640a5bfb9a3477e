//! Data-access hooks, one per resource.
//!
//! Each hook borrows the [`Portal`](crate::portal::Portal), reads through the
//! query cache (admin endpoint with a session, public endpoint without) and
//! runs writes that invalidate the resources listed in the invalidation table.

mod complaints;
mod employees;
mod feedback;
mod notifications;
mod organization;
mod ratings;
mod statistics;

pub use complaints::*;
pub use employees::*;
pub use feedback::*;
pub use notifications::*;
pub use organization::*;
pub use ratings::*;
pub use statistics::*;

use crate::errors::{PortalError, PortalResult};

/// View-facing outcome of a hook call.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<PortalError>,
}

impl<T> QueryState<T> {
    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Code the view can branch on for its fallback state.
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(PortalError::error_code)
    }
}

impl<T> From<PortalResult<T>> for QueryState<T> {
    fn from(result: PortalResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                data: None,
                error: Some(error),
            },
        }
    }
}
