//! Observers for every tracked unit of one demo

use std::time::Duration;

use serde::Serialize;

use super::observer::{RenderObserver, RenderSnapshot};

/// Snapshot of one unit, tagged with its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSnapshot {
    pub name: String,
    pub count: u64,
    pub active: bool,
}

/// Owns the render observers of a demo, keyed by unit name.
///
/// Observers are created on first observation and listed in creation order.
/// Unmounting a unit disposes and forgets its observer, so a remount starts
/// counting from scratch.
#[derive(Debug)]
pub struct ObserverRegistry {
    decay_window: Duration,
    observers: Vec<RenderObserver>,
}

impl ObserverRegistry {
    pub fn new(decay_window: Duration) -> Self {
        Self {
            decay_window,
            observers: Vec::new(),
        }
    }

    pub fn decay_window(&self) -> Duration {
        self.decay_window
    }

    /// Record a render of `name`, mounting an observer if needed
    pub fn observe(&mut self, name: &str) -> RenderSnapshot {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.observers
                    .push(RenderObserver::new(name, self.decay_window));
                self.observers.len() - 1
            }
        };
        self.observers[index].observe()
    }

    pub fn snapshot(&self, name: &str) -> Option<RenderSnapshot> {
        self.position(name)
            .map(|index| self.observers[index].snapshot())
    }

    pub fn snapshots(&self) -> Vec<UnitSnapshot> {
        self.observers
            .iter()
            .map(|observer| {
                let snapshot = observer.snapshot();
                UnitSnapshot {
                    name: observer.name().to_string(),
                    count: snapshot.count,
                    active: snapshot.active,
                }
            })
            .collect()
    }

    /// Dispose and forget the observer for `name`. Returns false when the
    /// unit was not mounted.
    pub fn dispose(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                let mut observer = self.observers.remove(index);
                observer.dispose();
                true
            }
            None => false,
        }
    }

    pub fn dispose_all(&mut self) {
        for mut observer in self.observers.drain(..) {
            observer.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.observers
            .iter()
            .position(|observer| observer.name() == name)
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
