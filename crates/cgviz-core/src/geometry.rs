//! Geometry handed to renderers.
//!
//! A scene is an ordered list of [`Geometry`] values. Each is either a flat
//! colored triangle mesh ([`BoxMesh`]) or a colored line set ([`LineSet`]).
//! Coordinates are kept in `f64` and are only narrowed when uploaded to a GPU.

use glam::DVec3;

/// An axis-aligned box mesh with a single color.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    /// Optional display label.
    pub label: Option<String>,
    /// Vertex positions in world space.
    pub vertices: Vec<DVec3>,
    /// Triangles as vertex index triples.
    pub triangles: Vec<[u32; 3]>,
    /// Color shared by every vertex.
    pub color: DVec3,
    /// Translation applied to the corner-anchored primitive.
    pub translation: DVec3,
    /// Half-extent after clamping.
    pub half_extent: DVec3,
}

impl BoxMesh {
    /// Returns the minimum and maximum corners.
    #[must_use]
    pub fn bounds(&self) -> (DVec3, DVec3) {
        bounds_of(&self.vertices).unwrap_or((self.translation, self.translation))
    }

    /// Returns the center of the box volume.
    #[must_use]
    pub fn volume_center(&self) -> DVec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }
}

/// A set of colored line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSet {
    /// Optional display label.
    pub label: Option<String>,
    /// Point positions in world space.
    pub points: Vec<DVec3>,
    /// Segments as point index pairs.
    pub lines: Vec<[u32; 2]>,
    /// One color per segment.
    pub colors: Vec<DVec3>,
}

impl LineSet {
    /// Returns the two endpoints of segment `index`.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<(DVec3, DVec3)> {
        let [a, b] = *self.lines.get(index)?;
        let a = *self.points.get(a as usize)?;
        let b = *self.points.get(b as usize)?;
        Some((a, b))
    }
}

/// A renderable piece of geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A colored box mesh.
    Box(BoxMesh),
    /// A colored line set.
    Lines(LineSet),
}

impl Geometry {
    /// Returns the type name of this geometry.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Box(_) => "BoxMesh",
            Geometry::Lines(_) => "LineSet",
        }
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Geometry::Box(mesh) => mesh.label.as_deref(),
            Geometry::Lines(lines) => lines.label.as_deref(),
        }
    }

    /// Returns the axis-aligned bounding box in world coordinates.
    ///
    /// Returns `None` for geometry without any points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        match self {
            Geometry::Box(mesh) => bounds_of(&mesh.vertices),
            Geometry::Lines(lines) => bounds_of(&lines.points),
        }
    }

    /// Returns the box mesh, if this is one.
    #[must_use]
    pub fn as_box(&self) -> Option<&BoxMesh> {
        match self {
            Geometry::Box(mesh) => Some(mesh),
            Geometry::Lines(_) => None,
        }
    }

    /// Returns the line set, if this is one.
    #[must_use]
    pub fn as_lines(&self) -> Option<&LineSet> {
        match self {
            Geometry::Lines(lines) => Some(lines),
            Geometry::Box(_) => None,
        }
    }
}

impl From<BoxMesh> for Geometry {
    fn from(mesh: BoxMesh) -> Self {
        Geometry::Box(mesh)
    }
}

impl From<LineSet> for Geometry {
    fn from(lines: LineSet) -> Self {
        Geometry::Lines(lines)
    }
}

/// Computes the combined bounding box of several geometries.
///
/// Non-finite coordinates are ignored so that one bad value cannot blow up the
/// scene extent.
#[must_use]
pub fn scene_bounds(geometries: &[Geometry]) -> Option<(DVec3, DVec3)> {
    geometries
        .iter()
        .filter_map(Geometry::bounding_box)
        .filter(|(min, max)| min.is_finite() && max.is_finite())
        .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
}

fn bounds_of(points: &[DVec3]) -> Option<(DVec3, DVec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}
