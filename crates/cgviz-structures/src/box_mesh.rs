//! Axis-aligned bounding box meshes.

use glam::DVec3;

use cgviz_core::{BoxMesh, BoxPlacement, CgvizError, Result, SceneConfig, DEFAULT_MIN_EXTENT};

/// Triangles of the corner-anchored unit box, outward facing.
///
/// Vertex `i` sits at `(i & 1, (i >> 2) & 1, (i >> 1) & 1)` scaled by the box
/// size, matching the usual box factory layout.
pub const BOX_TRIANGLES: [[u32; 3]; 12] = [
    [4, 7, 5],
    [4, 6, 7],
    [0, 2, 4],
    [2, 6, 4],
    [0, 1, 2],
    [1, 3, 2],
    [1, 5, 7],
    [1, 7, 3],
    [2, 3, 7],
    [2, 7, 6],
    [0, 4, 1],
    [1, 4, 5],
];

/// Builds colored box meshes from center / half-extent pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBuilder {
    min_extent: f64,
    placement: BoxPlacement,
}

impl BoxBuilder {
    /// Creates a builder with the default minimum extent and placement.
    pub fn new() -> Self {
        Self {
            min_extent: DEFAULT_MIN_EXTENT,
            placement: BoxPlacement::default(),
        }
    }

    /// Creates a builder from scene configuration.
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            min_extent: config.min_extent,
            placement: config.box_placement,
        }
    }

    /// Sets the minimum half-extent.
    pub fn with_min_extent(mut self, min_extent: f64) -> Self {
        self.min_extent = min_extent;
        self
    }

    /// Sets the placement convention.
    pub fn with_placement(mut self, placement: BoxPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Gets the minimum half-extent.
    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    /// Gets the placement convention.
    pub fn placement(&self) -> BoxPlacement {
        self.placement
    }

    /// Raises every component of `extent` to at least the minimum extent.
    pub fn clamp_extent(&self, extent: DVec3) -> DVec3 {
        DVec3::new(
            extent.x.max(self.min_extent),
            extent.y.max(self.min_extent),
            extent.z.max(self.min_extent),
        )
    }

    /// Returns the translation applied to the corner-anchored primitive.
    pub fn translation(&self, center: DVec3, half_extent: DVec3) -> DVec3 {
        match self.placement {
            BoxPlacement::Translate => center,
            BoxPlacement::Centered => center - half_extent,
        }
    }

    /// Builds a box with full size `2 * extent` and a single color.
    ///
    /// # Errors
    ///
    /// Returns [`CgvizError::InvalidGeometry`] if the center or extent has a
    /// non-finite component.
    pub fn build(&self, center: DVec3, extent: DVec3, color: DVec3) -> Result<BoxMesh> {
        if !center.is_finite() {
            return Err(CgvizError::InvalidGeometry(format!(
                "box center {center} is not finite"
            )));
        }
        if !extent.is_finite() {
            return Err(CgvizError::InvalidGeometry(format!(
                "box extent {extent} is not finite"
            )));
        }

        let half_extent = self.clamp_extent(extent);
        if half_extent != extent {
            log::trace!("clamped box extent {extent} to {half_extent}");
        }
        let size = 2.0 * half_extent;
        let translation = self.translation(center, half_extent);

        let vertices = (0..8u32)
            .map(|i| {
                let corner = DVec3::new(
                    if i & 1 == 0 { 0.0 } else { size.x },
                    if i & 4 == 0 { 0.0 } else { size.y },
                    if i & 2 == 0 { 0.0 } else { size.z },
                );
                corner + translation
            })
            .collect();

        Ok(BoxMesh {
            label: None,
            vertices,
            triangles: BOX_TRIANGLES.to_vec(),
            color,
            translation,
            half_extent,
        })
    }
}

impl Default for BoxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corner_layout() {
        let mesh = BoxBuilder::new()
            .build(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0), DVec3::X)
            .expect("build");
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.vertices[0], DVec3::ZERO);
        assert_eq!(mesh.vertices[1], DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[2], DVec3::new(0.0, 0.0, 6.0));
        assert_eq!(mesh.vertices[4], DVec3::new(0.0, 4.0, 0.0));
        assert_eq!(mesh.vertices[7], DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.triangles.len(), 12);
    }

    #[test]
    fn test_translate_placement_uses_center() {
        let center = DVec3::new(1.5, -2.0, 0.25);
        let extent = DVec3::new(0.5, 0.5, 0.5);
        let mesh = BoxBuilder::new().build(center, extent, DVec3::Y).expect("build");

        assert_eq!(mesh.translation, center);
        assert_ne!(mesh.translation, center - extent);
        let (min, max) = mesh.bounds();
        assert_eq!(min, center);
        assert_eq!(max, center + 2.0 * extent);
    }

    #[test]
    fn test_centered_placement() {
        let center = DVec3::new(1.0, 1.0, 1.0);
        let extent = DVec3::new(0.5, 1.0, 2.0);
        let mesh = BoxBuilder::new()
            .with_placement(BoxPlacement::Centered)
            .build(center, extent, DVec3::Z)
            .expect("build");

        assert_eq!(mesh.translation, center - extent);
        assert_eq!(mesh.volume_center(), center);
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = BoxBuilder::new()
            .with_placement(BoxPlacement::Centered)
            .build(DVec3::ZERO, DVec3::ONE, DVec3::X)
            .expect("build");

        for [a, b, c] in &mesh.triangles {
            let (a, b, c) = (
                mesh.vertices[*a as usize],
                mesh.vertices[*b as usize],
                mesh.vertices[*c as usize],
            );
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle faces inward");
        }
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let builder = BoxBuilder::new();
        assert!(matches!(
            builder.build(DVec3::new(f64::NAN, 0.0, 0.0), DVec3::ONE, DVec3::X),
            Err(CgvizError::InvalidGeometry(_))
        ));
        assert!(matches!(
            builder.build(DVec3::ZERO, DVec3::new(0.0, f64::INFINITY, 0.0), DVec3::X),
            Err(CgvizError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_uniform_color() {
        let color = DVec3::new(1.0, 0.0, 1.0);
        let mesh = BoxBuilder::new().build(DVec3::ZERO, DVec3::ONE, color).expect("build");
        assert_eq!(mesh.color, color);
    }

    proptest! {
        #[test]
        fn small_extents_clamp_to_minimum(
            ex in -10.0f64..=0.01,
            ey in -10.0f64..=0.01,
            ez in -10.0f64..=0.01,
        ) {
            let mesh = BoxBuilder::new()
                .build(DVec3::ZERO, DVec3::new(ex, ey, ez), DVec3::X)
                .unwrap();
            prop_assert_eq!(mesh.half_extent, DVec3::splat(0.01));
            let (min, max) = mesh.bounds();
            prop_assert!(((max - min) - DVec3::splat(0.02)).abs().max_element() < 1e-12);
        }

        #[test]
        fn large_extents_are_kept(
            ex in 0.011f64..100.0,
            ey in 0.011f64..100.0,
            ez in 0.011f64..100.0,
        ) {
            let extent = DVec3::new(ex, ey, ez);
            let mesh = BoxBuilder::new().build(DVec3::ONE, extent, DVec3::X).unwrap();
            prop_assert_eq!(mesh.half_extent, extent);
            prop_assert_eq!(mesh.translation, DVec3::ONE);
        }
    }
}
