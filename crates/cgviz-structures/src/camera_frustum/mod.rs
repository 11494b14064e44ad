//! Camera frustum wireframes for visualizing camera poses.

mod camera_pose;

pub use camera_pose::*;

use glam::{DVec2, DVec3};

use cgviz_core::{FrustumIntrinsics, LineSet, SceneConfig};

/// Frustum segments: four spokes from the camera center, then the image
/// rectangle.
pub const FRUSTUM_LINES: [[u32; 2]; 8] = [
    // From root to corners
    [0, 1],
    [0, 2],
    [0, 3],
    [0, 4],
    // Image rectangle
    [1, 2],
    [2, 3],
    [3, 4],
    [4, 1],
];

/// Builds frustum line sets from camera poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumBuilder {
    intrinsics: FrustumIntrinsics,
    color: DVec3,
}

impl FrustumBuilder {
    /// Creates a builder with the given intrinsics and a green line color.
    pub fn new(intrinsics: FrustumIntrinsics) -> Self {
        Self {
            intrinsics,
            color: DVec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Creates a builder from scene configuration.
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            intrinsics: config.intrinsics,
            color: config.frustum_color,
        }
    }

    /// Sets the line color.
    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }

    /// Gets the intrinsics.
    pub fn intrinsics(&self) -> &FrustumIntrinsics {
        &self.intrinsics
    }

    /// Gets the line color.
    pub fn color(&self) -> DVec3 {
        self.color
    }

    /// Pixel coordinates of the image corners: top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn image_corners(&self) -> [DVec2; 4] {
        let FrustumIntrinsics { width, height, .. } = self.intrinsics;
        [
            DVec2::new(0.0, 0.0),
            DVec2::new(width, 0.0),
            DVec2::new(width, height),
            DVec2::new(0.0, height),
        ]
    }

    /// Unprojects a pixel to the camera frame at the configured depth.
    pub fn unproject(&self, pixel: DVec2) -> DVec3 {
        let FrustumIntrinsics {
            fx,
            fy,
            cx,
            cy,
            depth,
            ..
        } = self.intrinsics;
        DVec3::new(
            (pixel.x - cx) * depth / fx,
            (pixel.y - cy) * depth / fy,
            depth,
        )
    }

    /// Builds the frustum wireframe for a pose.
    ///
    /// Point 0 is the camera center and points 1-4 are the image corners in
    /// world space. Intrinsics are not validated; degenerate values produce
    /// degenerate (possibly non-finite) points but always 5 points and 8 lines.
    pub fn build(&self, pose: &CameraPose) -> LineSet {
        let mut points = Vec::with_capacity(5);
        points.push(pose.position);
        points.extend(
            self.image_corners()
                .iter()
                .map(|corner| pose.camera_to_world(self.unproject(*corner))),
        );

        LineSet {
            label: None,
            points,
            lines: FRUSTUM_LINES.to_vec(),
            colors: vec![self.color; FRUSTUM_LINES.len()],
        }
    }
}

impl Default for FrustumBuilder {
    fn default() -> Self {
        Self::new(FrustumIntrinsics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DMat3;
    use proptest::prelude::*;

    #[test]
    fn test_identity_pose_corners() {
        let lines = FrustumBuilder::default().build(&CameraPose::default());

        assert_eq!(lines.points.len(), 5);
        assert_eq!(lines.points[0], DVec3::ZERO);
        assert_eq!(lines.points[1], DVec3::new(-3.2, -2.4, 5.0));
        assert_eq!(lines.points[2], DVec3::new(3.2, -2.4, 5.0));
        assert_eq!(lines.points[3], DVec3::new(3.2, 2.4, 5.0));
        assert_eq!(lines.points[4], DVec3::new(-3.2, 2.4, 5.0));
    }

    #[test]
    fn test_half_depth_corners() {
        let intrinsics = FrustumIntrinsics {
            depth: 2.5,
            ..FrustumIntrinsics::default()
        };
        let lines = FrustumBuilder::new(intrinsics).build(&CameraPose::default());
        assert_eq!(lines.points[1], DVec3::new(-1.6, -1.2, 2.5));
        assert_eq!(lines.points[3], DVec3::new(1.6, 1.2, 2.5));
    }

    #[test]
    fn test_lines_and_colors() {
        let lines = FrustumBuilder::default().build(&CameraPose::default());
        assert_eq!(lines.lines, FRUSTUM_LINES.to_vec());
        assert_eq!(lines.colors.len(), 8);
        assert!(lines.colors.iter().all(|c| *c == DVec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_translated_and_rotated_pose() {
        let pose = CameraPose::new(
            DVec3::new(1.0, 2.0, 3.0),
            rotation_from_yaw_pitch_roll(std::f64::consts::FRAC_PI_2, 0.0, 0.0),
        );
        let lines = FrustumBuilder::default().build(&pose);
        assert_eq!(lines.points[0], pose.position);

        // Yaw by 90 degrees maps camera +X onto world +Y.
        let top_left = lines.points[1];
        let expected = DVec3::new(1.0 + 2.4, 2.0 - 3.2, 3.0 + 5.0);
        assert!((top_left - expected).length() < 1e-12);
    }

    #[test]
    fn test_degenerate_intrinsics_do_not_panic() {
        let intrinsics = FrustumIntrinsics {
            fx: 0.0,
            fy: 0.0,
            ..FrustumIntrinsics::default()
        };
        let lines = FrustumBuilder::new(intrinsics).build(&CameraPose::default());
        assert_eq!(lines.points.len(), 5);
        assert_eq!(lines.lines.len(), 8);
        assert!(!lines.points[1].is_finite());
    }

    proptest! {
        #[test]
        fn always_five_points_and_eight_lines(
            fx in -1000.0f64..1000.0,
            fy in -1000.0f64..1000.0,
            cx in -1000.0f64..1000.0,
            cy in -1000.0f64..1000.0,
            width in 0.0f64..4000.0,
            height in 0.0f64..4000.0,
            depth in -10.0f64..10.0,
        ) {
            let intrinsics = FrustumIntrinsics { fx, fy, cx, cy, width, height, depth };
            let lines = FrustumBuilder::new(intrinsics)
                .build(&CameraPose::new(DVec3::ONE, DMat3::IDENTITY));
            prop_assert_eq!(lines.points.len(), 5);
            prop_assert_eq!(lines.lines.len(), 8);
            prop_assert_eq!(lines.colors.len(), 8);
        }
    }
}
