//! Raw-model normalisation primitives run before the road-space builder
//! sees any data (spec.md §4.7 "Diagnostics / healing").
//!
//! These are deliberately generic: they operate on primitive values and
//! `Ord`/`PartialOrd` keys, so `roadgeom-road`/`roadgeom-core` can apply
//! them to whatever raw-model fields need normalising without this crate
//! knowing the shape of that model.

use crate::issue::{Issue, IssueList};

/// Blank/whitespace-only string attribute → `default` (spec.md §4.7).
/// Returns the healed value and, if healing fired, the issue to record.
pub fn heal_blank_string(value: &str, default: &str, code: &str, location: &str) -> (String, Option<Issue>) {
    if value.trim().is_empty() {
        let issue = Issue::healed(code, location, format!("blank attribute defaulted to {default:?}"));
        (default.to_string(), Some(issue))
    } else {
        (value.to_string(), None)
    }
}

/// Non-finite numeric attribute → `0.0` (spec.md §4.7).
pub fn heal_non_finite(value: f64, code: &str, location: &str) -> (f64, Option<Issue>) {
    if value.is_finite() {
        (value, None)
    } else {
        let issue = Issue::healed(code, location, format!("non-finite value {value} defaulted to 0.0"));
        (0.0, Some(issue))
    }
}

/// A finite positive attribute that falls below `tolerance` → `0.0`
/// (spec.md §4.7: "Non-finite positive attribute below tolerance → 0.0",
/// applied here to lengths/widths that must either be meaningfully
/// positive or treated as absent).
pub fn heal_sub_tolerance_positive(value: f64, tolerance: f64, code: &str, location: &str) -> (f64, Option<Issue>) {
    if value.is_finite() && value > 0.0 && value < tolerance {
        let issue = Issue::healed(code, location, format!("sub-tolerance positive value {value} snapped to 0.0"));
        (0.0, Some(issue))
    } else {
        (value, None)
    }
}

/// Stably sorts `items` by `key`, then removes later duplicates that share
/// an equal key with an earlier one, retaining the first occurrence
/// (spec.md §4.7: "Non-strictly-sorted list ... stably sorted by key,
/// duplicates with equal key removed retaining the first").
pub fn sort_dedup_by_key<T, K, F>(mut items: Vec<T>, mut key: F, code: &str, location: &str) -> (Vec<T>, IssueList)
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let mut issues = IssueList::new();
    let was_sorted = items.windows(2).all(|w| key(&w[0]) <= key(&w[1]));
    if !was_sorted {
        items.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal));
        issues.push(Issue::healed(code, location, "list was not strictly sorted by key; stably re-sorted"));
    }
    let before = items.len();
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let duplicate = match out.last() {
            Some(last) => !(key(last) < key(&item)) && !(key(&item) < key(last)),
            None => false,
        };
        if !duplicate {
            out.push(item);
        }
    }
    if out.len() != before {
        issues.push(Issue::healed(code, location, format!("removed {} duplicate-key entries, retaining the first", before - out.len())));
    }
    (out, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_string_gets_default() {
        let (v, issue) = heal_blank_string("   ", "-1", "code", "loc");
        assert_eq!(v, "-1");
        assert!(issue.is_some());
    }

    #[test]
    fn non_blank_string_is_unchanged() {
        let (v, issue) = heal_blank_string("driving", "-1", "code", "loc");
        assert_eq!(v, "driving");
        assert!(issue.is_none());
    }

    #[test]
    fn non_finite_defaults_to_zero() {
        let (v, issue) = heal_non_finite(f64::NAN, "code", "loc");
        assert_eq!(v, 0.0);
        assert!(issue.is_some());
    }

    #[test]
    fn sub_tolerance_positive_snaps_to_zero() {
        let (v, issue) = heal_sub_tolerance_positive(1e-9, 1e-7, "code", "loc");
        assert_eq!(v, 0.0);
        assert!(issue.is_some());
    }

    #[test]
    fn above_tolerance_is_unchanged() {
        let (v, issue) = heal_sub_tolerance_positive(1.0, 1e-7, "code", "loc");
        assert_eq!(v, 1.0);
        assert!(issue.is_none());
    }

    #[test]
    fn sort_dedup_sorts_and_drops_duplicates() {
        let items = vec![(3, "c"), (1, "a"), (1, "a-dup"), (2, "b")];
        let (sorted, issues) = sort_dedup_by_key(items, |(k, _)| *k, "code", "loc");
        assert_eq!(sorted, vec![(1, "a"), (2, "b"), (3, "c")]);
        assert_eq!(issues.issues().len(), 2); // re-sorted + deduped
    }

    #[test]
    fn already_sorted_no_duplicates_raises_nothing() {
        let items = vec![(1, "a"), (2, "b")];
        let (sorted, issues) = sort_dedup_by_key(items, |(k, _)| *k, "code", "loc");
        assert_eq!(sorted.len(), 2);
        assert!(issues.issues().is_empty());
    }
}
