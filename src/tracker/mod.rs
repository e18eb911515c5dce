//! Render tracking: per-unit observers and the registry that owns them

mod observer;
mod registry;

pub use observer::{RenderObserver, RenderSnapshot, DEFAULT_DECAY_WINDOW};
pub use registry::{ObserverRegistry, UnitSnapshot};
