//! Ranges and range sets (spec.md §3 "Ranges", §4.1).
//!
//! A [`Range`] has independently typed lower and upper [`Bound`]s. All
//! containment predicates come in a strict and a fuzzy form; the fuzzy form
//! widens the range by `tol` on whichever side is bounded before testing,
//! which is what lets composite-curve member selection succeed at exact
//! segment boundaries despite accumulated float error (spec.md §4.2).

use std::cmp::Ordering;

/// One side of a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Bound<T> {
    /// the endpoint is included in the range
    Closed(T),
    /// the endpoint is excluded from the range
    Open(T),
    /// the range is unbounded on this side
    Unbounded,
}

impl<T: Copy> Bound<T> {
    /// the endpoint value, if any
    pub fn value(&self) -> Option<T> {
        match self {
            Bound::Closed(v) | Bound::Open(v) => Some(*v),
            Bound::Unbounded => None,
        }
    }

    /// true if this bound is `Closed`
    pub fn is_closed(&self) -> bool { matches!(self, Bound::Closed(_)) }
}

/// An interval `[lower, upper]` (bounds independently open/closed/unbounded).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Range<T> {
    /// the lower bound
    pub lower: Bound<T>,
    /// the upper bound
    pub upper: Bound<T>,
}

impl Range<f64> {
    /// A closed range `[lower, upper]`.
    pub fn closed(lower: f64, upper: f64) -> Self {
        Range { lower: Bound::Closed(lower), upper: Bound::Closed(upper) }
    }

    /// A range closed below and open above: `[lower, upper)`.
    pub fn half_open(lower: f64, upper: f64) -> Self {
        Range { lower: Bound::Closed(lower), upper: Bound::Open(upper) }
    }

    /// The unbounded range `(-inf, +inf)`.
    pub fn unbounded() -> Self { Range { lower: Bound::Unbounded, upper: Bound::Unbounded } }

    /// True if the range contains no points (only possible with equal,
    /// non-both-closed bounds, or a crossed pair).
    pub fn is_empty(&self) -> bool {
        match (self.lower.value(), self.upper.value()) {
            (Some(l), Some(u)) => {
                l > u || (l == u && !(self.lower.is_closed() && self.upper.is_closed()))
            }
            _ => false,
        }
    }

    /// `upper - lower`; `f64::INFINITY` if unbounded on either side.
    pub fn length(&self) -> f64 {
        match (self.lower.value(), self.upper.value()) {
            (Some(l), Some(u)) => (u - l).max(0.0),
            _ => f64::INFINITY,
        }
    }

    /// Strict containment.
    pub fn contains(&self, x: f64) -> bool {
        let lower_ok = match self.lower {
            Bound::Closed(l) => x >= l,
            Bound::Open(l) => x > l,
            Bound::Unbounded => true,
        };
        let upper_ok = match self.upper {
            Bound::Closed(u) => x <= u,
            Bound::Open(u) => x < u,
            Bound::Unbounded => true,
        };
        lower_ok && upper_ok
    }

    /// Containment widened by `tol` on each bounded side.
    pub fn fuzzy_contains(&self, x: f64, tol: f64) -> bool {
        let lower_ok = match self.lower.value() {
            Some(l) => x >= l - tol,
            None => true,
        };
        let upper_ok = match self.upper.value() {
            Some(u) => x <= u + tol,
            None => true,
        };
        lower_ok && upper_ok
    }

    /// `contains`, returned as a `Result` so callers can propagate the
    /// failure (spec.md §4.1 `containsAsResult`).
    pub fn contains_as_result(&self, x: f64) -> Result<f64, crate::NumericError> {
        if self.contains(x) {
            Ok(x)
        } else {
            Err(crate::NumericError::OutOfDomain { value: x, range: format!("{self:?}") })
        }
    }

    /// True if `self` and `other` overlap or touch (their union is a single
    /// interval).
    pub fn is_connected(&self, other: &Range<f64>) -> bool {
        !self.intersection(other).is_empty()
            || match (self.upper.value(), other.lower.value()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
            || match (other.upper.value(), self.lower.value()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
    }

    /// True if `self` fully contains `other`.
    pub fn encloses(&self, other: &Range<f64>) -> bool {
        let lower_ok = match (self.lower.value(), other.lower.value()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(l), Some(ol)) => {
                l < ol || (l == ol && (self.lower.is_closed() || !other.lower.is_closed()))
            }
        };
        let upper_ok = match (self.upper.value(), other.upper.value()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(u), Some(ou)) => {
                u > ou || (u == ou && (self.upper.is_closed() || !other.upper.is_closed()))
            }
        };
        lower_ok && upper_ok
    }

    /// `encloses`, widened by `tol`.
    pub fn fuzzy_encloses(&self, other: &Range<f64>, tol: f64) -> bool {
        let widened = Range {
            lower: match self.lower {
                Bound::Closed(l) => Bound::Closed(l - tol),
                Bound::Open(l) => Bound::Closed(l - tol),
                Bound::Unbounded => Bound::Unbounded,
            },
            upper: match self.upper {
                Bound::Closed(u) => Bound::Closed(u + tol),
                Bound::Open(u) => Bound::Closed(u + tol),
                Bound::Unbounded => Bound::Unbounded,
            },
        };
        widened.encloses(other)
    }

    /// The overlap of `self` and `other`, empty if disjoint.
    pub fn intersection(&self, other: &Range<f64>) -> Range<f64> {
        let lower = match (self.lower, other.lower) {
            (Bound::Unbounded, b) => b,
            (a, Bound::Unbounded) => a,
            (Bound::Closed(a), Bound::Closed(b)) => {
                if a >= b { Bound::Closed(a) } else { Bound::Closed(b) }
            }
            (a, b) => {
                let (av, bv) = (a.value().unwrap(), b.value().unwrap());
                if av > bv {
                    a
                } else if bv > av {
                    b
                } else {
                    Bound::Open(av)
                }
            }
        };
        let upper = match (self.upper, other.upper) {
            (Bound::Unbounded, b) => b,
            (a, Bound::Unbounded) => a,
            (Bound::Closed(a), Bound::Closed(b)) => {
                if a <= b { Bound::Closed(a) } else { Bound::Closed(b) }
            }
            (a, b) => {
                let (av, bv) = (a.value().unwrap(), b.value().unwrap());
                if av < bv {
                    a
                } else if bv < av {
                    b
                } else {
                    Bound::Open(av)
                }
            }
        };
        Range { lower, upper }
    }

    /// The smallest range enclosing both `self` and `other`.
    pub fn span(&self, other: &Range<f64>) -> Range<f64> {
        let lower = match (self.lower.value(), other.lower.value()) {
            (Some(a), Some(b)) if a <= b => self.lower,
            (Some(a), Some(b)) if b < a => other.lower,
            _ => Bound::Unbounded,
        };
        let upper = match (self.upper.value(), other.upper.value()) {
            (Some(a), Some(b)) if a >= b => self.upper,
            (Some(a), Some(b)) if b > a => other.upper,
            _ => Bound::Unbounded,
        };
        Range { lower, upper }
    }

    /// Translate both bounds by `delta`.
    pub fn shift(&self, delta: f64) -> Range<f64> {
        Range {
            lower: match self.lower {
                Bound::Closed(v) => Bound::Closed(v + delta),
                Bound::Open(v) => Bound::Open(v + delta),
                Bound::Unbounded => Bound::Unbounded,
            },
            upper: match self.upper {
                Bound::Closed(v) => Bound::Closed(v + delta),
                Bound::Open(v) => Bound::Open(v + delta),
                Bound::Unbounded => Bound::Unbounded,
            },
        }
    }

    /// Grow both bounded sides outward by `amount`.
    pub fn widen(&self, amount: f64) -> Range<f64> {
        Range {
            lower: match self.lower {
                Bound::Closed(v) => Bound::Closed(v - amount),
                Bound::Open(v) => Bound::Open(v - amount),
                Bound::Unbounded => Bound::Unbounded,
            },
            upper: match self.upper {
                Bound::Closed(v) => Bound::Closed(v + amount),
                Bound::Open(v) => Bound::Open(v + amount),
                Bound::Unbounded => Bound::Unbounded,
            },
        }
    }

    /// Produces the strictly increasing array `lower, lower+step, ...`
    /// (direction taken from the range's own sign), optionally appending the
    /// upper endpoint when it is not already within `tol` of the last
    /// sample (spec.md §4.1, tested by §8 property 4).
    ///
    /// An empty range yields an empty array; a single-point range yields
    /// `[point]` iff `include_end`, else an empty array.
    pub fn arrange(&self, step: f64, include_end: bool, tol: f64) -> Vec<f64> {
        assert!(step > 0.0, "arrange requires a positive step");
        if self.is_empty() {
            return Vec::new();
        }
        let (lower, upper) = match (self.lower.value(), self.upper.value()) {
            (Some(l), Some(u)) => (l, u),
            _ => panic!("arrange requires a bounded range"),
        };
        if fuzzy_equals_local(lower, upper, tol) {
            return if include_end { vec![lower] } else { Vec::new() };
        }
        let mut out = Vec::new();
        let mut x = lower;
        while x < upper - tol {
            out.push(x);
            x += step;
        }
        if include_end {
            match out.last() {
                Some(&last) if fuzzy_equals_local(last, upper, tol) => {}
                _ => out.push(upper),
            }
        }
        out
    }
}

fn fuzzy_equals_local(a: f64, b: f64, tol: f64) -> bool { (a - b).abs() <= tol }

/// A disjoint union of [`Range<f64>`]s, kept sorted and merged.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeSet {
    ranges: Vec<Range<f64>>,
}

impl RangeSet {
    /// An empty set.
    pub fn new() -> Self { RangeSet { ranges: Vec::new() } }

    /// The member ranges, sorted and pairwise disjoint.
    pub fn ranges(&self) -> &[Range<f64>] { &self.ranges }

    /// Add `range` to the set, merging with any overlapping/touching member.
    pub fn insert(&mut self, range: Range<f64>) {
        if range.is_empty() {
            return;
        }
        self.ranges.push(range);
        self.normalize();
    }

    fn normalize(&mut self) {
        self.ranges.retain(|r| !r.is_empty());
        self.ranges.sort_by(|a, b| {
            let av = a.lower.value().unwrap_or(f64::NEG_INFINITY);
            let bv = b.lower.value().unwrap_or(f64::NEG_INFINITY);
            av.partial_cmp(&bv).unwrap_or(Ordering::Equal)
        });
        let mut merged: Vec<Range<f64>> = Vec::new();
        for r in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if last.is_connected(&r) => *last = last.span(&r),
                _ => merged.push(r),
            }
        }
        self.ranges = merged;
    }

    /// Union with `other`.
    pub fn union(&self, other: &RangeSet) -> RangeSet {
        let mut out = self.clone();
        for r in &other.ranges {
            out.insert(*r);
        }
        out
    }

    /// Intersection with `other`.
    pub fn intersection(&self, other: &RangeSet) -> RangeSet {
        let mut out = RangeSet::new();
        for a in &self.ranges {
            for b in &other.ranges {
                let i = a.intersection(b);
                if !i.is_empty() {
                    out.ranges.push(i);
                }
            }
        }
        out.normalize();
        out
    }

    /// `self` minus `other`.
    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        let mut result = self.clone();
        for b in &other.ranges {
            let mut next = Vec::new();
            for a in &result.ranges {
                next.extend(subtract_one(a, b));
            }
            result.ranges = next;
        }
        result.normalize();
        result
    }

    /// True if any member range contains `x`.
    pub fn contains(&self, x: f64) -> bool { self.ranges.iter().any(|r| r.contains(x)) }
}

fn subtract_one(a: &Range<f64>, b: &Range<f64>) -> Vec<Range<f64>> {
    let inter = a.intersection(b);
    if inter.is_empty() {
        return vec![*a];
    }
    let mut out = Vec::new();
    if let Some(al) = a.lower.value() {
        if let Some(il) = inter.lower.value() {
            if al < il || (al == il && a.lower.is_closed() && !inter.lower.is_closed()) {
                out.push(Range {
                    lower: a.lower,
                    upper: if inter.lower.is_closed() { Bound::Open(il) } else { Bound::Closed(il) },
                });
            }
        }
    } else if let Some(il) = inter.lower.value() {
        out.push(Range {
            lower: Bound::Unbounded,
            upper: if inter.lower.is_closed() { Bound::Open(il) } else { Bound::Closed(il) },
        });
    }
    if let Some(au) = a.upper.value() {
        if let Some(iu) = inter.upper.value() {
            if au > iu || (au == iu && a.upper.is_closed() && !inter.upper.is_closed()) {
                out.push(Range {
                    lower: if inter.upper.is_closed() { Bound::Open(iu) } else { Bound::Closed(iu) },
                    upper: a.upper,
                });
            }
        }
    } else if let Some(iu) = inter.upper.value() {
        out.push(Range {
            lower: if inter.upper.is_closed() { Bound::Open(iu) } else { Bound::Closed(iu) },
            upper: Bound::Unbounded,
        });
    }
    out.into_iter().filter(|r| !r.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrange_strictly_increasing_and_ends_near_upper() {
        let r = Range::closed(1.0, 10.0);
        let xs = r.arrange(1.0, true, 1e-7);
        assert_eq!(xs.first(), Some(&1.0));
        assert!((xs.last().unwrap() - 10.0).abs() <= 1e-7);
        for w in xs.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn arrange_empty_range_yields_empty() {
        let r = Range::closed(5.0, 1.0);
        assert!(r.arrange(1.0, true, 1e-7).is_empty());
    }

    #[test]
    fn arrange_single_point() {
        let r = Range::closed(3.0, 3.0);
        assert_eq!(r.arrange(1.0, true, 1e-7), vec![3.0]);
        assert!(r.arrange(1.0, false, 1e-7).is_empty());
    }

    #[test]
    fn fuzzy_contains_widens_bounded_sides() {
        let r = Range::closed(0.0, 10.0);
        assert!(r.fuzzy_contains(10.0000001, 1e-6));
        assert!(!r.fuzzy_contains(10.1, 1e-6));
    }

    #[test]
    fn range_set_merges_overlaps() {
        let mut set = RangeSet::new();
        set.insert(Range::closed(0.0, 5.0));
        set.insert(Range::closed(4.0, 10.0));
        assert_eq!(set.ranges().len(), 1);
        assert_eq!(set.ranges()[0].length(), 10.0);
    }

    #[test]
    fn range_set_difference() {
        let mut a = RangeSet::new();
        a.insert(Range::closed(0.0, 10.0));
        let mut b = RangeSet::new();
        b.insert(Range::closed(3.0, 5.0));
        let d = a.difference(&b);
        assert_eq!(d.ranges().len(), 2);
    }
}
