//! Gates in front of protected views.
//!
//! Each guard runs its backend calls on a spawned task and publishes its
//! state on a `watch` channel. A guard owns a [`Liveness`] token that is
//! revoked when the guard is dropped; the task checks it before applying
//! any result, so a guard that is gone never writes state or redirects.

mod role;
mod session;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use role::RoleGuard;
pub use session::SessionGuard;

/// What a guard puts on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<T> {
    /// Check still in flight.
    Loading,
    /// Check failed; a redirect has been issued.
    Empty,
    /// Check passed; the wrapped content.
    Content(T),
}

impl<T> Frame<T> {
    #[must_use]
    pub const fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    pub fn into_content(self) -> Option<T> {
        match self {
            Self::Content(content) => Some(content),
            Self::Loading | Self::Empty => None,
        }
    }
}

/// Shared flag that flips to dead exactly once.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
