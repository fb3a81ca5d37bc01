//! Structured diagnostics (spec.md §4.7: "Every healing action adds a
//! structured issue: {code, severity, location, message, wasFixed}").

use serde::{Deserialize, Serialize};

/// How serious an [`Issue`] is (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// purely informational, no action taken on the model
    Info,
    /// the model was healed; evaluation continues with the healed value
    Warning,
    /// a local entity (segment, edge, sample) was dropped; its siblings
    /// continue
    Error,
    /// the containing road cannot be built at all
    Fatal,
}

/// One diagnostic raised while healing the raw model or building a road
/// (spec.md §4.7, §7 "Error handling design").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// a short machine-stable code, e.g. `"lane-offset-drops-shape"`
    pub code: String,
    /// how serious this issue is
    pub severity: Severity,
    /// the identifier path to the source entity, e.g.
    /// `"road[12]/laneSection[0]/lane[-1]"`
    pub location: String,
    /// a human-readable message
    pub message: String,
    /// whether the model was automatically corrected (`true`) or the
    /// offending entity was simply dropped/rejected (`false`)
    pub was_fixed: bool,
}

impl Issue {
    /// Builds an issue.
    pub fn new(code: impl Into<String>, severity: Severity, location: impl Into<String>, message: impl Into<String>, was_fixed: bool) -> Self {
        Issue { code: code.into(), severity, location: location.into(), message: message.into(), was_fixed }
    }

    /// A `Warning`-severity healed issue.
    pub fn healed(code: impl Into<String>, location: impl Into<String>, message: impl Into<String>) -> Self {
        Issue::new(code, Severity::Warning, location, message, true)
    }

    /// An `Error`-severity dropped-entity issue.
    pub fn dropped(code: impl Into<String>, location: impl Into<String>, message: impl Into<String>) -> Self {
        Issue::new(code, Severity::Error, location, message, false)
    }

    /// A `Fatal`-severity issue.
    pub fn fatal(code: impl Into<String>, location: impl Into<String>, message: impl Into<String>) -> Self {
        Issue::new(code, Severity::Fatal, location, message, false)
    }

    /// An `Info`-severity issue.
    pub fn info(code: impl Into<String>, location: impl Into<String>, message: impl Into<String>) -> Self {
        Issue::new(code, Severity::Info, location, message, false)
    }
}

/// An accumulating, append-only list of [`Issue`]s (spec.md §5: "The
/// diagnostic list is per-road, merged at the end by single-producer
/// append").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueList {
    issues: Vec<Issue>,
}

impl IssueList {
    /// An empty list.
    pub fn new() -> Self { IssueList { issues: Vec::new() } }

    /// Appends one issue.
    pub fn push(&mut self, issue: Issue) { self.issues.push(issue); }

    /// Appends every issue from `other`, draining it.
    pub fn extend(&mut self, other: IssueList) { self.issues.extend(other.issues); }

    /// The issues, in the order raised.
    pub fn issues(&self) -> &[Issue] { &self.issues }

    /// True iff any issue is `Fatal` (spec.md §4.7: "An issue list is fatal
    /// iff it contains any FATAL").
    pub fn is_fatal(&self) -> bool { self.issues.iter().any(|i| i.severity == Severity::Fatal) }

    /// Issues at or above `min`, most-severe callers typically want `Error`.
    pub fn at_least(&self, min: Severity) -> impl Iterator<Item = &Issue> { self.issues.iter().filter(move |i| i.severity >= min) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_detection() {
        let mut list = IssueList::new();
        list.push(Issue::healed("x", "road[0]", "healed"));
        assert!(!list.is_fatal());
        list.push(Issue::fatal("y", "road[0]", "broken"));
        assert!(list.is_fatal());
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn extend_merges_in_order() {
        let mut a = IssueList::new();
        a.push(Issue::info("a", "loc", "first"));
        let mut b = IssueList::new();
        b.push(Issue::info("b", "loc", "second"));
        a.extend(b);
        assert_eq!(a.issues().len(), 2);
        assert_eq!(a.issues()[1].code, "b");
    }
}
