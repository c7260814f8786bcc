//! Redirect sink for guards and the post-authentication router.

use std::sync::Mutex;

use haven_core::Route;

pub trait Navigator: Send + Sync {
    /// Replace the current location with `route`.
    fn redirect(&self, route: Route);
}

/// Keeps every redirect in order. The CLI reads the last one to decide what
/// to print; tests assert on the whole history.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        tracing::debug!(%route, "redirect");
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(route);
    }
}
