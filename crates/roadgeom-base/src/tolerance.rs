//! Tolerance discipline (spec.md §4.1): every geometric predicate that
//! compares two doubles goes through `fuzzy_equals`/`fuzzy_less_or_equal`
//! rather than `==`/`<=` directly.

/// The default tolerance used when a road does not specify its own, per
/// spec.md §6 (`tolerance` default `1e-7`).
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// `|a - b| <= tol`.
#[inline]
pub fn fuzzy_equals(a: f64, b: f64, tol: f64) -> bool { (a - b).abs() <= tol }

/// `a <= b + tol`.
#[inline]
pub fn fuzzy_less_or_equal(a: f64, b: f64, tol: f64) -> bool { a <= b + tol }

/// `a >= b - tol`.
#[inline]
pub fn fuzzy_greater_or_equal(a: f64, b: f64, tol: f64) -> bool { a >= b - tol }

/// Trait for values that support tolerance-based near-equality, matching the
/// teacher's `Tolerance` trait (`truck_geometry::traits::Tolerance`).
pub trait Tolerance {
    /// True if `self` and `other` are within `tol` of each other.
    fn near(&self, other: &Self, tol: f64) -> bool;
}

impl Tolerance for f64 {
    fn near(&self, other: &Self, tol: f64) -> bool { fuzzy_equals(*self, *other, tol) }
}

impl Tolerance for cgmath::Vector2<f64> {
    fn near(&self, other: &Self, tol: f64) -> bool {
        use cgmath::InnerSpace;
        (self - other).magnitude() <= tol
    }
}

impl Tolerance for cgmath::Vector3<f64> {
    fn near(&self, other: &Self, tol: f64) -> bool {
        use cgmath::InnerSpace;
        (self - other).magnitude() <= tol
    }
}

impl Tolerance for cgmath::Point2<f64> {
    fn near(&self, other: &Self, tol: f64) -> bool {
        use cgmath::{EuclideanSpace, InnerSpace};
        (self.to_vec() - other.to_vec()).magnitude() <= tol
    }
}

impl Tolerance for cgmath::Point3<f64> {
    fn near(&self, other: &Self, tol: f64) -> bool {
        use cgmath::{EuclideanSpace, InnerSpace};
        (self.to_vec() - other.to_vec()).magnitude() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_equals_accepts_within_tol() {
        assert!(fuzzy_equals(1.0, 1.0000001, 1e-6));
        assert!(!fuzzy_equals(1.0, 1.1, 1e-6));
    }

    #[test]
    fn fuzzy_ordering() {
        assert!(fuzzy_less_or_equal(1.0000001, 1.0, 1e-6));
        assert!(!fuzzy_less_or_equal(1.1, 1.0, 1e-6));
    }
}
