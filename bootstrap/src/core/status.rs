//! Status labels persisted per action.

use std::fmt;

/// Persisted outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The action ran to completion.
    Done,
    /// The operator declined the action.
    Unwanted,
    /// Any other label found on disk.
    Custom(String),
}

impl Status {
    pub const DONE: &'static str = "DONE";
    pub const UNWANTED: &'static str = "UNWANTED";

    /// Parse status file contents. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            Self::DONE => Status::Done,
            Self::UNWANTED => Status::Unwanted,
            other => Status::Custom(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Status::Done => Self::DONE,
            Status::Unwanted => Self::UNWANTED,
            Status::Custom(label) => label,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an action still has work to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Necessity {
    Needed,
    /// Already handled; the label explains why (a status file label, or
    /// `NOT_NEEDED` from a custom check).
    Satisfied(String),
}

impl Necessity {
    pub const NOT_NEEDED: &'static str = "NOT_NEEDED";

    /// Result of a custom check that is a plain yes/no.
    pub fn from_needed(needed: bool) -> Self {
        if needed {
            Necessity::Needed
        } else {
            Necessity::Satisfied(Self::NOT_NEEDED.to_string())
        }
    }

    /// Derive necessity from an optional persisted status.
    pub fn from_status(status: Option<&Status>) -> Self {
        match status {
            None => Necessity::Needed,
            Some(status) => Necessity::Satisfied(status.label().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_recognizes_known_labels() {
        assert_eq!(Status::parse("DONE\n"), Status::Done);
        assert_eq!(Status::parse("  UNWANTED "), Status::Unwanted);
        assert_eq!(Status::parse("done"), Status::Custom("done".to_string()));
    }

    #[test]
    fn absent_status_means_needed() {
        assert_eq!(Necessity::from_status(None), Necessity::Needed);
        assert_eq!(
            Necessity::from_status(Some(&Status::Unwanted)),
            Necessity::Satisfied("UNWANTED".to_string())
        );
    }

    #[test]
    fn custom_check_false_is_not_needed() {
        assert_eq!(
            Necessity::from_needed(false),
            Necessity::Satisfied("NOT_NEEDED".to_string())
        );
        assert_eq!(Necessity::from_needed(true), Necessity::Needed);
    }
}
