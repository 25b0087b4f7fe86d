//! Environment snapshots.
//!
//! A [`Snapshot`] is built either from a live environment
//! ([`Snapshot::from_environment`]) or from a requirements file, and can be
//! written back out as requirements text or JSON.

mod capture;
mod model;
mod reconcile;
mod text;

pub use capture::{Capture, CaptureOptions, RUNTIME_PACKAGE};
pub use model::Snapshot;
pub use reconcile::{dedupe, pop_by_name};
pub use text::{parse_lines, render_lines, LineSeparator};
