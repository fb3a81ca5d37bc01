//! Concrete 3-D surfaces (spec.md §3 "Surfaces"): rectangle, circle,
//! cylinder, a parametric-bounded surface derived from two curve-relative
//! boundaries, and a parametric sweep of a cross-section along a path
//! curve. Each implements [`roadgeom_geotrait::SurfaceLocal`] in its own
//! local frame; placement is the caller's job via an affine.

use cgmath::{Point3, Vector3};
use roadgeom_base::Function;
use roadgeom_geotrait::{Curve3D, CurveError, SurfaceLocal};

/// An axis-aligned rectangle centered at the origin in the local XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// extent along local x
    pub length: f64,
    /// extent along local y
    pub width: f64,
}

impl Rectangle {
    /// Builds a rectangle, rejecting non-positive or non-finite extents.
    pub fn try_new(length: f64, width: f64) -> Result<Self, CurveError> {
        if !(length.is_finite() && length > 0.0 && width.is_finite() && width > 0.0) {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("rectangle extents must be positive and finite (length={length}, width={width})"),
            });
        }
        Ok(Rectangle { length, width })
    }
}

impl SurfaceLocal for Rectangle {
    fn calculate_polygons_local(&self) -> Result<Vec<Vec<Point3<f64>>>, CurveError> {
        let hl = self.length / 2.0;
        let hw = self.width / 2.0;
        Ok(vec![vec![
            Point3::new(-hl, -hw, 0.0),
            Point3::new(hl, -hw, 0.0),
            Point3::new(hl, hw, 0.0),
            Point3::new(-hl, hw, 0.0),
        ]])
    }
}

/// A circle centered at the origin in the local XY plane, discretised into
/// `slices` vertices (spec.md `circleSlices`, minimum 3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// the circle's radius
    pub radius: f64,
    /// number of discretisation slices, at least 3
    pub slices: usize,
}

impl Circle {
    /// Builds a circle, rejecting a non-positive radius or fewer than 3
    /// slices.
    pub fn try_new(radius: f64, slices: usize) -> Result<Self, CurveError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CurveError::GeometryDegenerate { reason: format!("circle radius must be positive and finite, got {radius}") });
        }
        if slices < 3 {
            return Err(CurveError::GeometryDegenerate { reason: format!("circle requires at least 3 slices, got {slices}") });
        }
        Ok(Circle { radius, slices })
    }

    fn ring(&self, z: f64) -> Vec<Point3<f64>> {
        (0..self.slices)
            .map(|i| {
                let theta = 2.0 * std::f64::consts::PI * i as f64 / self.slices as f64;
                Point3::new(self.radius * theta.cos(), self.radius * theta.sin(), z)
            })
            .collect()
    }
}

impl SurfaceLocal for Circle {
    fn calculate_polygons_local(&self) -> Result<Vec<Vec<Point3<f64>>>, CurveError> {
        Ok(vec![self.ring(0.0)])
    }
}

/// A circular cylinder, axis along local z, base centered at the origin
/// (spec.md §4.4: "radius+height → cylinder").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// base radius
    pub radius: f64,
    /// extrusion height, along +z
    pub height: f64,
    /// number of discretisation slices, at least 3
    pub slices: usize,
}

impl Cylinder {
    /// Builds a cylinder, rejecting non-positive radius/height or fewer
    /// than 3 slices.
    pub fn try_new(radius: f64, height: f64, slices: usize) -> Result<Self, CurveError> {
        if !(radius.is_finite() && radius > 0.0 && height.is_finite() && height > 0.0) {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("cylinder radius/height must be positive and finite (radius={radius}, height={height})"),
            });
        }
        if slices < 3 {
            return Err(CurveError::GeometryDegenerate { reason: format!("cylinder requires at least 3 slices, got {slices}") });
        }
        Ok(Cylinder { radius, height, slices })
    }
}

impl SurfaceLocal for Cylinder {
    fn calculate_polygons_local(&self) -> Result<Vec<Vec<Point3<f64>>>, CurveError> {
        let base = Circle { radius: self.radius, slices: self.slices };
        let bottom = base.ring(0.0);
        let top = base.ring(self.height);
        let mut polys = Vec::with_capacity(self.slices + 2);
        polys.push(bottom.iter().rev().cloned().collect());
        polys.push(top.clone());
        for i in 0..self.slices {
            let j = (i + 1) % self.slices;
            polys.push(vec![bottom[i], bottom[j], top[j], top[i]]);
        }
        Ok(polys)
    }
}

/// A surface bounded by two curve-relative boundary curves, sampled at a
/// common `step` and quadded pairwise (spec.md §3: "parametric-bounded
/// surface derived from two curve-relative boundary curves sampled at
/// step"). Backs lane surfaces in the road-space builder.
#[derive(Debug)]
pub struct ParametricBoundedSurface {
    /// the inner (lower-`t`) boundary
    pub inner: Box<dyn Curve3D>,
    /// the outer (higher-`t`) boundary, same domain as `inner`
    pub outer: Box<dyn Curve3D>,
    /// the sampling step along the shared domain
    pub step: f64,
}

impl SurfaceLocal for ParametricBoundedSurface {
    fn calculate_polygons_local(&self) -> Result<Vec<Vec<Point3<f64>>>, CurveError> {
        let tol = self.inner.tolerance();
        let samples = self.inner.domain().arrange(self.step, true, tol);
        let mut polys = Vec::with_capacity(samples.len().saturating_sub(1));
        for w in samples.windows(2) {
            let (s0, s1) = (w[0], w[1]);
            let i0 = self.inner.pose_local(s0)?.point;
            let i1 = self.inner.pose_local(s1)?.point;
            let o0 = self.outer.pose_local(s0)?.point;
            let o1 = self.outer.pose_local(s1)?.point;
            polys.push(vec![i0, o0, o1, i1]);
        }
        Ok(polys)
    }
}

/// A cross-section (`width(s)` x `height(s)`) swept along a 3-D path curve
/// (spec.md §3: "parametric sweep: profile swept along 3-D curve with
/// per-s height/width"). Backs continuous road-object repeat sweeps (C6).
#[derive(Debug)]
pub struct ParametricSweep {
    /// the path the cross-section is swept along
    pub path: Box<dyn Curve3D>,
    /// the cross-section's lateral width at `s`
    pub width: Function,
    /// the cross-section's height at `s`, extruded along local +z
    pub height: Function,
    /// the sampling step along the path
    pub step: f64,
}

impl ParametricSweep {
    fn cross_section(&self, s: f64) -> Result<[Point3<f64>; 4], CurveError> {
        let pose = self.path.pose_local(s)?;
        let tol = self.path.tolerance();
        let w = self
            .width
            .value_fuzzy(s, tol)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let h = self
            .height
            .value_fuzzy(s, tol)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let (sin_h, cos_h) = pose.heading.sin_cos();
        let half_left = Vector3::new(-sin_h, cos_h, 0.0) * (w / 2.0);
        let bottom_left = pose.point - half_left;
        let bottom_right = pose.point + half_left;
        let top_left = Point3::new(bottom_left.x, bottom_left.y, bottom_left.z + h);
        let top_right = Point3::new(bottom_right.x, bottom_right.y, bottom_right.z + h);
        Ok([bottom_left, bottom_right, top_right, top_left])
    }
}

impl SurfaceLocal for ParametricSweep {
    fn calculate_polygons_local(&self) -> Result<Vec<Vec<Point3<f64>>>, CurveError> {
        let tol = self.path.tolerance();
        let samples = self.path.domain().arrange(self.step, true, tol);
        let mut polys = Vec::with_capacity(samples.len().saturating_sub(1) * 3);
        for w in samples.windows(2) {
            let c0 = self.cross_section(w[0])?;
            let c1 = self.cross_section(w[1])?;
            polys.push(vec![c0[3], c1[3], c1[2], c0[2]]); // top
            polys.push(vec![c0[0], c1[0], c1[3], c0[3]]); // left wall
            polys.push(vec![c0[1], c0[2], c1[2], c1[1]]); // right wall
        }
        Ok(polys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_has_expected_corners() {
        let r = Rectangle::try_new(4.0, 2.0).unwrap();
        let polys = r.calculate_polygons_local().unwrap();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 4);
        assert!((polys[0][0].x + 2.0).abs() < 1e-12);
    }

    #[test]
    fn circle_has_requested_slice_count() {
        let c = Circle::try_new(5.0, 12).unwrap();
        let polys = c.calculate_polygons_local().unwrap();
        assert_eq!(polys[0].len(), 12);
        for p in &polys[0] {
            assert!(((p.x * p.x + p.y * p.y).sqrt() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn circle_rejects_too_few_slices() {
        assert!(Circle::try_new(1.0, 2).is_err());
    }

    #[test]
    fn cylinder_produces_caps_and_side_walls() {
        let cyl = Cylinder::try_new(1.0, 3.0, 8).unwrap();
        let polys = cyl.calculate_polygons_local().unwrap();
        // 2 caps + 8 side quads
        assert_eq!(polys.len(), 10);
    }
}
