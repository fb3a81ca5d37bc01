//! Outbound discretised artefact types (spec.md §6 "Outbound — discretised
//! artefacts").

use cgmath::Point3;
use roadgeom_geometry::Polygon3D;

/// A tessellated surface: lane surfaces, and lateral/longitudinal fillers,
/// all carry this shape (spec.md §6: "one polygon mesh per lane surface
/// ... polygon meshes for lateral and longitudinal fillers").
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonMesh {
    /// the mesh's polygons, in generation order
    pub polygons: Vec<Polygon3D>,
}

impl PolygonMesh {
    /// Wraps already-built quads (typically from [`crate::sample::sample_bounded_surface`])
    /// into a mesh, unvalidated: curve-sampled quads may be legitimately
    /// non-planar for warped surfaces (see `Polygon3D::new_unchecked`).
    pub fn from_unchecked_polygons(polygons: Vec<Vec<Point3<f64>>>) -> Self {
        PolygonMesh { polygons: polygons.into_iter().map(Polygon3D::new_unchecked).collect() }
    }

    /// True if this mesh has no polygons (e.g. every sample failed).
    pub fn is_empty(&self) -> bool { self.polygons.is_empty() }
}

/// A sampled polyline: lane boundaries, and curve samples generally
/// (spec.md §6: "one polyline per lane boundary (left, right, centre)").
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3D {
    /// the polyline's points, in arc-length order
    pub points: Vec<Point3<f64>>,
}

/// A road object's discretised geometry: a closed mesh for solids
/// (cuboid/cylinder/outline), or a polyline for flat shapes traced as a
/// ring (rectangle/circle).
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectGeometry {
    /// a polygon mesh (cuboid, cylinder, outline, or a swept `repeat`)
    Mesh(PolygonMesh),
    /// a closed polyline (rectangle, circle)
    Polyline(Polyline3D),
}

/// Any discretised artefact, tagged with its originating identifier and
/// accumulated attribute list (spec.md §6: "Each artefact carries its
/// originating identifier ... and the accumulated attribute list").
#[derive(Debug, Clone, PartialEq)]
pub struct Artefact<T> {
    /// an identifier path, e.g. `"road[12]/laneSection[0]/lane[-1]"`
    pub identifier: String,
    /// accumulated key/value attributes carried through from the raw model
    pub attributes: Vec<(String, String)>,
    /// the artefact's geometry
    pub geometry: T,
}

impl<T> Artefact<T> {
    /// Builds an artefact with no attributes.
    pub fn new(identifier: impl Into<String>, geometry: T) -> Self {
        Artefact { identifier: identifier.into(), attributes: Vec::new(), geometry }
    }

    /// Builds an artefact with the given attributes.
    pub fn with_attributes(identifier: impl Into<String>, attributes: Vec<(String, String)>, geometry: T) -> Self {
        Artefact { identifier: identifier.into(), attributes, geometry }
    }
}
