//! Render counting for a single observed unit
//!
//! A [`RenderObserver`] counts how often a named unit is recomputed and raises
//! a transient `active` flag after every re-render. The flag is bounded by a
//! deadline one decay window after the latest re-render. Inside a tokio
//! runtime a timer task also clears it eagerly; that task is restarted on each
//! observation and aborted on dispose.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default time the `active` flag stays raised after a re-render
pub const DEFAULT_DECAY_WINDOW: Duration = Duration::from_millis(500);

/// Point-in-time view of an observer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderSnapshot {
    /// Number of observed renders since mount
    pub count: u64,
    /// Whether the unit re-rendered within the decay window
    pub active: bool,
}

#[derive(Debug, Default)]
struct ObserverState {
    count: u64,
    active: bool,
    mounted: bool,
    disposed: bool,
    /// Bumped on every re-render so a superseded timer cannot clear the flag
    generation: u64,
    /// End of the current decay window; `None` once frozen or expired
    deadline: Option<Instant>,
}

impl ObserverState {
    fn is_active(&self, now: Instant) -> bool {
        self.active && self.deadline.map_or(true, |deadline| now < deadline)
    }

    fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            count: self.count,
            active: self.is_active(Instant::now()),
        }
    }

    /// Apply an expired decay timer. Returns false when the timer was stale.
    fn expire(&mut self, generation: u64) -> bool {
        if self.disposed || generation != self.generation {
            return false;
        }
        self.active = false;
        self.deadline = None;
        true
    }

    /// Pin `active` to its current value so nothing flips it later
    fn freeze(&mut self, now: Instant) {
        self.active = self.is_active(now);
        self.deadline = None;
        self.disposed = true;
    }
}

/// Counts and flags re-renders of one named unit
pub struct RenderObserver {
    name: String,
    decay_window: Duration,
    state: Arc<Mutex<ObserverState>>,
    timer: Option<JoinHandle<()>>,
}

impl RenderObserver {
    /// Create an observer for `name`. Nothing is counted until the first
    /// [`observe`](Self::observe).
    pub fn new(name: impl Into<String>, decay_window: Duration) -> Self {
        Self {
            name: name.into(),
            decay_window,
            state: Arc::new(Mutex::new(ObserverState::default())),
            timer: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one render of the unit.
    ///
    /// The first call marks the mount and never raises `active`. Every later
    /// call bumps the count, raises `active` and restarts the decay window.
    /// Calls after [`dispose`](Self::dispose) return the frozen snapshot.
    pub fn observe(&mut self) -> RenderSnapshot {
        let mut state = self.state.lock();
        if state.disposed {
            return state.snapshot();
        }

        if !state.mounted {
            state.mounted = true;
            state.count = 1;
            tracing::debug!(unit = %self.name, count = state.count, "Unit mounted");
            return state.snapshot();
        }

        state.count += 1;
        state.generation += 1;
        state.active = true;
        state.deadline = Some(Instant::now() + self.decay_window);
        let generation = state.generation;

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        // Without a runtime the deadline alone ends the window
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let shared = Arc::clone(&self.state);
            let window = self.decay_window;
            self.timer = Some(runtime.spawn(async move {
                tokio::time::sleep(window).await;
                shared.lock().expire(generation);
            }));
        }

        tracing::debug!(unit = %self.name, count = state.count, "Unit rendered");
        state.snapshot()
    }

    /// Current `{count, active}` view
    pub fn snapshot(&self) -> RenderSnapshot {
        self.state.lock().snapshot()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Cancel any pending decay timer and freeze the observer. Safe to call
    /// more than once.
    pub fn dispose(&mut self) {
        let mut state = self.state.lock();
        if state.disposed {
            return;
        }
        state.freeze(Instant::now());
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        tracing::debug!(unit = %self.name, count = state.count, "Observer disposed");
    }
}

impl Drop for RenderObserver {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl std::fmt::Debug for RenderObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("RenderObserver")
            .field("name", &self.name)
            .field("count", &snapshot.count)
            .field("active", &snapshot.active)
            .field("decay_window", &self.decay_window)
            .finish()
    }
}
