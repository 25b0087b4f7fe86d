//! Environment detection.

pub mod environment;

pub use environment::{EnvironmentDetector, EnvironmentKind};
