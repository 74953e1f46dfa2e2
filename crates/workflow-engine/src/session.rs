//! Execution session management
//!
//! Each execution pass is issued a strictly-increasing token. At most one
//! token is active per engine instance at any instant; beginning a new
//! pass immediately deactivates the previous one, which is how run
//! supersession and cooperative cancellation are implemented.
//!
//! The token is a structured primitive passed through the pass and
//! checked at loop boundaries, never a process-global variable, so
//! multiple engine instances can coexist without interference.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Sentinel stored in the active slot when no pass may proceed.
///
/// Token ids start at 1, so this value matches no issued token.
const NO_ACTIVE_TOKEN: u64 = 0;

/// Issues run tokens and tracks which one is currently active
pub struct SessionManager {
    /// Monotonic token counter
    next: AtomicU64,
    /// The currently active token id, shared with issued tokens
    active: Arc<AtomicU64>,
}

impl SessionManager {
    /// Create a session manager with no active pass
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            active: Arc::new(AtomicU64::new(NO_ACTIVE_TOKEN)),
        }
    }

    /// Begin a new pass, superseding any pass currently in flight
    ///
    /// The returned token is the single active one until the next call
    /// to `begin` or `cancel`.
    pub fn begin(&self) -> RunToken {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.active.store(id, Ordering::Relaxed);
        RunToken {
            id,
            active: Arc::clone(&self.active),
        }
    }

    /// Deactivate the current pass without starting a new one
    ///
    /// Any in-flight pass halts at its next liveness check.
    pub fn cancel(&self) {
        self.active.store(NO_ACTIVE_TOKEN, Ordering::Relaxed);
    }

    /// The id of the currently active token, if any
    pub fn active_id(&self) -> Option<u64> {
        match self.active.load(Ordering::Relaxed) {
            NO_ACTIVE_TOKEN => None,
            id => Some(id),
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Token identifying one execution pass
///
/// The scheduler checks `is_live` immediately before attempting each
/// node; a stale token means the pass was cancelled or superseded and
/// must stop emitting events.
#[derive(Clone)]
pub struct RunToken {
    id: u64,
    active: Arc<AtomicU64>,
}

impl RunToken {
    /// The unique id of this token
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether this token is still the active one
    pub fn is_live(&self) -> bool {
        self.active.load(Ordering::Relaxed) == self.id
    }
}

impl std::fmt::Debug for RunToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunToken")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}
