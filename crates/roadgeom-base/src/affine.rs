//! 2-D and 3-D affine transforms and transform sequences (spec.md §3
//! "Poses and rotations", §4.1 C2).
//!
//! These are pure translation + rotation + uniform/per-axis scale
//! composites; they know nothing about curves or roads. Downstream crates
//! build them from Tait-Bryan rotations (roadgeom-geometry) and append them
//! into an [`AffineSequence`] the way the curve kernel resolves local to
//! global frames (spec.md §3 "A 3-D curve... `AffineSequence` resolves a
//! list of affines into one via left-to-right multiplication").

use cgmath::{Matrix2, Matrix3, Point2, Point3, SquareMatrix, Vector2, Vector3};

/// A 2-D affine transform `x -> linear * x + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    /// the 2x2 linear part (rotation composed with scale)
    pub linear: Matrix2<f64>,
    /// the translation part
    pub translation: Vector2<f64>,
}

impl Affine2D {
    /// The identity transform.
    pub fn identity() -> Self { Affine2D { linear: Matrix2::from_scale(1.0), translation: Vector2::new(0.0, 0.0) } }

    /// A pure translation.
    pub fn from_translation(t: Vector2<f64>) -> Self { Affine2D { linear: Matrix2::from_scale(1.0), translation: t } }

    /// A pure rotation by `angle` radians (counterclockwise).
    pub fn from_angle(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Affine2D { linear: Matrix2::new(c, s, -s, c), translation: Vector2::new(0.0, 0.0) }
    }

    /// A pose: rotate by `angle` then translate to `origin`.
    pub fn from_pose(origin: Point2<f64>, angle: f64) -> Self {
        let rot = Self::from_angle(angle);
        Affine2D { linear: rot.linear, translation: Vector2::new(origin.x, origin.y) }
    }

    /// `self` applied after `other`: `x -> self(other(x))`.
    pub fn append(&self, other: &Affine2D) -> Affine2D {
        Affine2D {
            linear: self.linear * other.linear,
            translation: self.linear * other.translation + self.translation,
        }
    }

    /// The inverse transform, assuming `linear` is invertible.
    pub fn invert(&self) -> Option<Affine2D> {
        let inv_linear = self.linear.invert()?;
        Some(Affine2D { linear: inv_linear, translation: -(inv_linear * self.translation) })
    }

    /// Transform a point.
    pub fn transform_point(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.linear * Vector2::new(p.x, p.y) + self.translation;
        Point2::new(v.x, v.y)
    }

    /// Transform a vector (ignores translation).
    pub fn transform_vector(&self, v: Vector2<f64>) -> Vector2<f64> { self.linear * v }

    /// Transform every vertex of a polyline/polygon.
    pub fn transform_polygon(&self, points: &[Point2<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.transform_point(*p)).collect()
    }

    /// The rotation angle this transform would apply to the +x axis.
    pub fn rotation_angle(&self) -> f64 {
        let v = self.linear * Vector2::new(1.0, 0.0);
        v.y.atan2(v.x)
    }
}

/// A 3-D affine transform `x -> linear * x + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine3D {
    /// the 3x3 linear part (rotation composed with scale)
    pub linear: Matrix3<f64>,
    /// the translation part
    pub translation: Vector3<f64>,
}

impl Affine3D {
    /// The identity transform.
    pub fn identity() -> Self {
        Affine3D { linear: Matrix3::from_scale(1.0), translation: Vector3::new(0.0, 0.0, 0.0) }
    }

    /// A pure translation.
    pub fn from_translation(t: Vector3<f64>) -> Self {
        Affine3D { linear: Matrix3::from_scale(1.0), translation: t }
    }

    /// A pure rotation.
    pub fn from_rotation(linear: Matrix3<f64>) -> Self { Affine3D { linear, translation: Vector3::new(0.0, 0.0, 0.0) } }

    /// A uniform scale.
    pub fn from_scale(scale: f64) -> Self { Affine3D { linear: Matrix3::from_scale(scale), translation: Vector3::new(0.0, 0.0, 0.0) } }

    /// Builds from translation, rotation and (possibly non-uniform) scale,
    /// in the order scale, then rotate, then translate.
    pub fn from_parts(translation: Vector3<f64>, rotation: Matrix3<f64>, scale: Vector3<f64>) -> Self {
        let scale_mat = Matrix3::from_diagonal(scale);
        Affine3D { linear: rotation * scale_mat, translation }
    }

    /// `self` applied after `other`: `x -> self(other(x))`.
    pub fn append(&self, other: &Affine3D) -> Affine3D {
        Affine3D {
            linear: self.linear * other.linear,
            translation: self.linear * other.translation + self.translation,
        }
    }

    /// The inverse transform, assuming `linear` is invertible.
    pub fn invert(&self) -> Option<Affine3D> {
        let inv_linear = self.linear.invert()?;
        Some(Affine3D { linear: inv_linear, translation: -(inv_linear * self.translation) })
    }

    /// Transform a point.
    pub fn transform_point(&self, p: Point3<f64>) -> Point3<f64> {
        let v = self.linear * Vector3::new(p.x, p.y, p.z) + self.translation;
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a vector (ignores translation).
    pub fn transform_vector(&self, v: Vector3<f64>) -> Vector3<f64> { self.linear * v }

    /// Transform every vertex of a polygon.
    pub fn transform_polygon(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.transform_point(*p)).collect()
    }

    /// The translation component, as a point.
    pub fn translation_point(&self) -> Point3<f64> {
        Point3::new(self.translation.x, self.translation.y, self.translation.z)
    }
}

/// An ordered list of affines resolved left-to-right into a single
/// transform (spec.md §3): `resolve() = affines[0].append(affines[1])...`
/// so that `affines[0]` is applied *last* (outermost), matching the "local
/// -> global" reading order. An empty sequence resolves to identity.
#[derive(Debug, Clone, Default)]
pub struct AffineSequence {
    affines: Vec<Affine3D>,
}

impl AffineSequence {
    /// An empty sequence (resolves to identity).
    pub fn new() -> Self { AffineSequence { affines: Vec::new() } }

    /// Append `affine` as the next-outermost transform.
    pub fn push(&mut self, affine: Affine3D) { self.affines.push(affine); }

    /// Builds a sequence from an explicit, outermost-first list.
    pub fn from_vec(affines: Vec<Affine3D>) -> Self { AffineSequence { affines } }

    /// Resolve the whole list into one affine via left-to-right
    /// (outermost-first) composition.
    pub fn resolve(&self) -> Affine3D {
        self.affines
            .iter()
            .fold(Affine3D::identity(), |acc, a| acc.append(a))
    }

    /// True if the sequence has no entries.
    pub fn is_empty(&self) -> bool { self.affines.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rad;

    #[test]
    fn identity_roundtrip() {
        let id = Affine3D::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(id.transform_point(p), p);
    }

    #[test]
    fn invert_undoes_translation() {
        use cgmath::InnerSpace;
        let t = Affine3D::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let inv = t.invert().unwrap();
        let p = Point3::new(5.0, 5.0, 5.0);
        let back = inv.transform_point(t.transform_point(p));
        assert!((back - p).magnitude() < 1e-9);
    }

    #[test]
    fn sequence_empty_is_identity() {
        let seq = AffineSequence::new();
        let p = Point3::new(3.0, 4.0, 5.0);
        assert_eq!(seq.resolve().transform_point(p), p);
    }

    #[test]
    fn sequence_composes_left_to_right() {
        let mut seq = AffineSequence::new();
        seq.push(Affine3D::from_translation(Vector3::new(1.0, 0.0, 0.0)));
        seq.push(Affine3D::from_rotation(Matrix3::from_angle_z(Rad(std::f64::consts::FRAC_PI_2))));
        // resolve = translate.append(rotate): apply rotate first, then translate
        let p = Point3::new(1.0, 0.0, 0.0);
        let resolved = seq.resolve().transform_point(p);
        assert!((resolved.x - 1.0).abs() < 1e-9);
        assert!((resolved.y - 1.0).abs() < 1e-9);
    }
}
