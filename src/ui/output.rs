//! Output verbosity.

/// How much status output to show.
///
/// Requirements text and JSON written to stdout are data, not status, and
/// are shown in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show status messages and warnings.
    #[default]
    Normal,
    /// Show nothing except errors.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_normal_shows_status() {
        assert!(OutputMode::Normal.shows_status());
        assert!(!OutputMode::Quiet.shows_status());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
