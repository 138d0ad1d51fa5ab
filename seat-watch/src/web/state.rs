//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::SearchConfig;
use crate::stations::StationNames;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<U, S> {
    /// Upstream timetable and seat source
    pub upstream: Arc<U>,

    /// Where new watches are stored
    pub store: Arc<S>,

    /// Station display names
    pub names: StationNames,

    /// Alternative search configuration
    pub config: Arc<SearchConfig>,
}

impl<U, S> AppState<U, S> {
    /// Create a new app state.
    pub fn new(upstream: U, store: S, names: StationNames, config: SearchConfig) -> Self {
        Self {
            upstream: Arc::new(upstream),
            store: Arc::new(store),
            names,
            config: Arc::new(config),
        }
    }
}

// Derived Clone would require `U: Clone` and `S: Clone`.
impl<U, S> Clone for AppState<U, S> {
    fn clone(&self) -> Self {
        Self {
            upstream: Arc::clone(&self.upstream),
            store: Arc::clone(&self.store),
            names: self.names.clone(),
            config: Arc::clone(&self.config),
        }
    }
}
