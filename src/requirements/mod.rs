//! Requirement records and their text forms.
//!
//! # Modules
//!
//! - [`name`] - Canonical package names used as the identity of a requirement
//! - [`specifier`] - Version specifier clauses (`>=1.0,<2`)
//! - [`full`] - Pip requirement lines with extras, URLs and markers
//! - [`simple`] - Conda package pins (`name=version=build`)
//! - [`record`] - The [`RequirementRecord`] trait shared by both kinds

pub mod full;
pub mod name;
pub mod record;
pub mod simple;
pub mod specifier;

pub use full::FullRequirement;
pub use name::{normalize_name, PackageName};
pub use record::RequirementRecord;
pub use simple::SimpleRequirement;
pub use specifier::{Comparator, SpecifierSet, VersionSpecifier};
