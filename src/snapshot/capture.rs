//! Capturing a snapshot from a live environment.

use crate::detection::EnvironmentKind;
use crate::error::Result;
use crate::requirements::{PackageName, RequirementRecord};
use crate::sources::{CondaSource, PipSource, SkippedPackage, UnreportablePolicy};

use super::model::Snapshot;
use super::reconcile::{dedupe, pop_by_name};

/// Package whose conda record carries the runtime version.
pub const RUNTIME_PACKAGE: &str = "python";

/// Knobs for [`Snapshot::from_environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Report every installed package, not only those nothing else depends on.
    pub include_nested: bool,
    pub on_unreportable: UnreportablePolicy,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            include_nested: true,
            on_unreportable: UnreportablePolicy::Warn,
        }
    }
}

/// A captured snapshot plus the packages that could not be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub snapshot: Snapshot,
    pub skipped: Vec<SkippedPackage>,
}

impl Snapshot {
    /// Capture the environment described by `kind`.
    ///
    /// Conda is only queried for [`EnvironmentKind::Conda`]. Its list is
    /// authoritative: pip packages that conda also manages are dropped from
    /// the primary list, and conda's `python` record supplies the runtime
    /// version.
    ///
    /// # Errors
    ///
    /// Propagates source failures, `UnreportablePackage` under
    /// [`UnreportablePolicy::Raise`], and `DuplicateRequirement` if pip
    /// reports a package twice.
    pub fn from_environment<C, P>(
        kind: EnvironmentKind,
        conda: &C,
        pip: &P,
        options: &CaptureOptions,
        default_runtime: &str,
    ) -> Result<Capture>
    where
        C: CondaSource + ?Sized,
        P: PipSource + ?Sized,
    {
        let conda_records = if kind.has_conda() {
            conda.installed()?
        } else {
            tracing::debug!("Not a conda environment, skipping conda");
            Vec::new()
        };

        let report = pip.installed(options.include_nested, options.on_unreportable)?;
        let pip_count = report.requirements.len();

        let (conda_records, pip_records) = dedupe(conda_records, report.requirements);
        if pip_records.len() < pip_count {
            tracing::debug!(
                "Dropped {} pip packages also managed by conda",
                pip_count - pip_records.len()
            );
        }

        let runtime = PackageName::new(RUNTIME_PACKAGE)?;
        let (runtime_record, conda_records) = pop_by_name(conda_records, &runtime);
        let runtime_version = runtime_record.and_then(|r| r.version().map(str::to_string));

        let snapshot = Self::new(runtime_version, pip_records, conda_records, default_runtime)?;
        tracing::debug!(
            "Captured {} requirements ({} from conda) for Python {}",
            snapshot.primary_requirements().len(),
            snapshot.secondary_requirements().len(),
            snapshot.runtime_version()
        );

        Ok(Capture {
            snapshot,
            skipped: report.skipped,
        })
    }
}
