//! Application state shared across handlers.

use std::sync::Arc;

use database::{Database, StatusPolicy};
use worksheet_gen::WorksheetGenerator;

use crate::config::AuthHeaders;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Worksheet content generator.
    pub generator: Arc<dyn WorksheetGenerator>,
    /// Policy for backward status moves.
    pub status_policy: StatusPolicy,
    /// Where to find the signed-in identity on a request.
    pub auth: AuthHeaders,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        generator: Arc<dyn WorksheetGenerator>,
        status_policy: StatusPolicy,
        auth: AuthHeaders,
    ) -> Self {
        Self {
            db,
            generator,
            status_policy,
            auth,
        }
    }
}
