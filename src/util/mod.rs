//! Utility modules

pub mod paths;

pub use paths::LabPaths;
