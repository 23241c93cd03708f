use std::sync::Arc;

use crate::profile::normalize::NormalizeOptions;
use crate::profile::query::QuerySettings;
use crate::profile::source::ProfileSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable profile backend. Default: GraphqlProfileSource.
    pub source: Arc<dyn ProfileSource>,
    pub query_settings: QuerySettings,
    pub normalize_options: NormalizeOptions,
}
