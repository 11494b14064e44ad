//! Camera poses (position and camera-to-world rotation).

use glam::{DMat3, DVec3};

use cgviz_core::CameraRecord;

/// Builds a camera-to-world rotation from yaw, pitch and roll in radians.
///
/// The matrix is evaluated entry by entry from the closed form of the
/// intrinsic Z-Y-X (yaw, pitch, roll) composition, so results are identical
/// across platforms rather than depending on a chain of matrix products.
#[must_use]
pub fn rotation_from_yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> DMat3 {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sr, cr) = roll.sin_cos();

    let rows = [
        [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr],
        [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr],
        [-sp, cp * sr, cp * cr],
    ];
    matrix_from_rows(rows)
}

/// Builds a matrix from row-major entries.
#[must_use]
pub fn matrix_from_rows(rows: [[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(&rows).transpose()
}

/// A camera pose in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera center in world space.
    pub position: DVec3,
    /// Camera-to-world rotation.
    pub rotation: DMat3,
}

impl CameraPose {
    /// Creates a pose from a position and a camera-to-world rotation.
    pub fn new(position: DVec3, rotation: DMat3) -> Self {
        Self { position, rotation }
    }

    /// Creates a pose from a position and yaw/pitch/roll in degrees.
    pub fn from_degrees(position: DVec3, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::new(
            position,
            rotation_from_yaw_pitch_roll(yaw.to_radians(), pitch.to_radians(), roll.to_radians()),
        )
    }

    /// Creates a pose from a decoded camera record.
    pub fn from_record(record: &CameraRecord) -> Self {
        match record {
            CameraRecord::Euler {
                camera_position,
                camera_orientation,
            } => Self::from_degrees(
                camera_position.to_dvec3(),
                camera_orientation.yaw,
                camera_orientation.pitch,
                camera_orientation.roll,
            ),
            CameraRecord::Matrix {
                translation,
                rotation_matrix,
            } => Self::new(
                DVec3::from_array(*translation),
                matrix_from_rows(*rotation_matrix),
            ),
        }
    }

    /// Maps a camera-frame point to world space (`R * p + position`).
    pub fn camera_to_world(&self, point: DVec3) -> DVec3 {
        let rotated = DVec3::new(
            self.rotation.row(0).dot(point),
            self.rotation.row(1).dot(point),
            self.rotation.row(2).dot(point),
        );
        rotated + self.position
    }

    /// Gets the optical axis (camera +Z) in world space.
    pub fn look_dir(&self) -> DVec3 {
        self.rotation.z_axis
    }

    /// Gets the image-down direction (camera +Y) in world space.
    pub fn down_dir(&self) -> DVec3 {
        self.rotation.y_axis
    }

    /// Gets the image-right direction (camera +X) in world space.
    pub fn right_dir(&self) -> DVec3 {
        self.rotation.x_axis
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(DVec3::ZERO, DMat3::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgviz_core::{CameraOrientation, CameraPosition};
    use proptest::prelude::*;

    fn assert_mat_close(a: DMat3, b: DMat3) {
        assert!(
            a.abs_diff_eq(b, 1e-12),
            "matrices differ:\n{a}\n{b}"
        );
    }

    #[test]
    fn test_zero_angles_is_identity() {
        assert_eq!(rotation_from_yaw_pitch_roll(0.0, 0.0, 0.0), DMat3::IDENTITY);
    }

    #[test]
    fn test_matches_zyx_composition() {
        let (yaw, pitch, roll) = (0.3, -1.1, 2.4);
        let composed =
            DMat3::from_rotation_z(yaw) * DMat3::from_rotation_y(pitch) * DMat3::from_rotation_x(roll);
        assert_mat_close(rotation_from_yaw_pitch_roll(yaw, pitch, roll), composed);
    }

    #[test]
    fn test_closed_form_entries_are_exact() {
        let yaw = 30.0f64.to_radians();
        let pitch = (-10.0f64).to_radians();
        let roll = 5.0f64.to_radians();
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sr, cr) = roll.sin_cos();

        let r = rotation_from_yaw_pitch_roll(yaw, pitch, roll);
        let expected = [
            [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr],
            [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr],
            [-sp, cp * sr, cp * cr],
        ];
        for (i, row) in expected.iter().enumerate() {
            // Bit-for-bit, not approximately.
            assert_eq!(r.row(i).to_array(), *row, "row {i}");
        }
    }

    #[test]
    fn test_yaw_only_rotates_about_z() {
        let r = rotation_from_yaw_pitch_roll(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        let x = r * DVec3::X;
        assert!((x - DVec3::Y).length() < 1e-12);
        assert_eq!(r.row(2), DVec3::Z);
    }

    #[test]
    fn test_matrix_from_rows_is_row_major() {
        let m = matrix_from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.row(0), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.col(0), DVec3::new(1.0, 4.0, 7.0));
    }

    #[test]
    fn test_from_record_converts_degrees() {
        let record = CameraRecord::Euler {
            camera_position: CameraPosition { x: 1.0, y: 2.0, z: 3.0 },
            camera_orientation: CameraOrientation {
                yaw: 90.0,
                pitch: 0.0,
                roll: 0.0,
            },
        };
        let pose = CameraPose::from_record(&record);
        assert_eq!(pose.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            pose.rotation,
            rotation_from_yaw_pitch_roll(90f64.to_radians(), 0.0, 0.0)
        );
    }

    #[test]
    fn test_camera_to_world() {
        let pose = CameraPose::new(DVec3::new(10.0, 0.0, 0.0), DMat3::IDENTITY);
        assert_eq!(
            pose.camera_to_world(DVec3::new(1.0, 2.0, 3.0)),
            DVec3::new(11.0, 2.0, 3.0)
        );
        assert_eq!(pose.look_dir(), DVec3::Z);
    }

    proptest! {
        #[test]
        fn rotation_is_orthonormal(
            yaw in -720.0f64..720.0,
            pitch in -720.0f64..720.0,
            roll in -720.0f64..720.0,
        ) {
            let r = CameraPose::from_degrees(DVec3::ZERO, yaw, pitch, roll).rotation;
            prop_assert!((r * r.transpose()).abs_diff_eq(DMat3::IDENTITY, 1e-9));
            prop_assert!((r.determinant() - 1.0).abs() < 1e-9);
        }
    }
}
