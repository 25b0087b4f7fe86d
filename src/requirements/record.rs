//! The capability shared by every requirement kind.

use std::fmt::Display;

use super::name::PackageName;

/// A requirement that can take part in reconciliation.
///
/// Two records refer to the same package when their [`PackageName`]s are
/// equal; versions, extras and markers play no part in that identity.
pub trait RequirementRecord: Display {
    /// The normalized package name.
    fn name(&self) -> &PackageName;

    /// The exact version, when the record pins one.
    fn version(&self) -> Option<&str>;

    /// Check whether both records refer to the same package.
    fn same_package<R: RequirementRecord + ?Sized>(&self, other: &R) -> bool {
        self.name() == other.name()
    }
}
