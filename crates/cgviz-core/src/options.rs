//! Configuration options for cgviz.

use std::path::PathBuf;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Number of entries in the object color palette.
pub const PALETTE_SIZE: usize = 6;

/// Smallest half-extent a box may have along any axis.
pub const DEFAULT_MIN_EXTENT: f64 = 0.01;

/// Pinhole camera parameters used to draw camera frustums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrustumIntrinsics {
    /// Focal length along x, in pixels.
    pub fx: f64,
    /// Focal length along y, in pixels.
    pub fy: f64,
    /// Principal point x, in pixels.
    pub cx: f64,
    /// Principal point y, in pixels.
    pub cy: f64,
    /// Image width in pixels.
    pub width: f64,
    /// Image height in pixels.
    pub height: f64,
    /// Distance along the optical axis at which the image plane is drawn.
    pub depth: f64,
}

impl Default for FrustumIntrinsics {
    fn default() -> Self {
        Self {
            fx: 500.0,
            fy: 500.0,
            cx: 320.0,
            cy: 240.0,
            width: 640.0,
            height: 480.0,
            depth: 5.0,
        }
    }
}

/// How a box is positioned relative to the center of its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoxPlacement {
    /// The corner-anchored box is translated by the record center, so its
    /// minimum corner sits at the center.
    #[default]
    Translate,
    /// The box is translated by `center - extent`, so it is centered on the
    /// record center.
    Centered,
}

/// Configuration for loading and building a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Path of the object-graph JSON document.
    pub object_graph_path: PathBuf,

    /// Path of the camera-pose JSON document.
    pub camera_poses_path: PathBuf,

    /// Intrinsics used for every camera frustum.
    pub intrinsics: FrustumIntrinsics,

    /// Line color of camera frustums.
    pub frustum_color: DVec3,

    /// Object colors, picked by `id mod PALETTE_SIZE`.
    pub palette: [DVec3; PALETTE_SIZE],

    /// Lower bound applied to every box half-extent.
    pub min_extent: f64,

    /// Box placement convention.
    pub box_placement: BoxPlacement,

    /// Viewer background color.
    pub background_color: DVec3,
}

impl SceneConfig {
    /// Returns the palette color for an object id.
    ///
    /// Uses the Euclidean remainder so negative ids still map into the palette.
    #[must_use]
    pub fn color_for_id(&self, id: i128) -> DVec3 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = id.rem_euclid(PALETTE_SIZE as i128) as usize;
        self.palette[index]
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            object_graph_path: PathBuf::from("./CG_CERB/obj_json_r_mapping_stride10.json"),
            camera_poses_path: PathBuf::from("camera_poses.json"),
            intrinsics: FrustumIntrinsics::default(),
            frustum_color: DVec3::new(0.0, 1.0, 0.0),
            palette: [
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(0.0, 0.0, 1.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(1.0, 0.0, 1.0),
                DVec3::new(0.0, 1.0, 1.0),
            ],
            min_extent: DEFAULT_MIN_EXTENT,
            box_placement: BoxPlacement::Translate,
            background_color: DVec3::new(0.1, 0.1, 0.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_intrinsics() {
        let intrinsics = FrustumIntrinsics::default();
        assert_eq!(intrinsics.fx, 500.0);
        assert_eq!(intrinsics.cy, 240.0);
        assert_eq!(intrinsics.width, 640.0);
        assert_eq!(intrinsics.depth, 5.0);
    }

    #[test]
    fn test_palette_order() {
        let config = SceneConfig::default();
        assert_eq!(config.color_for_id(0), DVec3::X);
        assert_eq!(config.color_for_id(1), DVec3::Y);
        assert_eq!(config.color_for_id(2), DVec3::Z);
        assert_eq!(config.color_for_id(5), DVec3::new(0.0, 1.0, 1.0));
        assert_eq!(config.color_for_id(6), DVec3::X);
    }

    #[test]
    fn test_negative_id_wraps() {
        let config = SceneConfig::default();
        assert_eq!(config.color_for_id(-1), config.palette[5]);
    }

    #[test]
    fn test_unsigned_ids_beyond_i64() {
        let config = SceneConfig::default();
        assert_eq!(config.color_for_id(i128::from(u64::MAX)), config.palette[3]);
        assert_eq!(config.color_for_id(i128::from(i64::MAX) + 1), config.palette[2]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SceneConfig =
            serde_json::from_str(r#"{"intrinsics": {"depth": 2.5}, "min_extent": 0.05}"#)
                .expect("config should parse");
        assert_eq!(config.intrinsics.depth, 2.5);
        assert_eq!(config.intrinsics.fx, 500.0);
        assert_eq!(config.min_extent, 0.05);
        assert_eq!(config.box_placement, BoxPlacement::Translate);
    }

    proptest! {
        #[test]
        fn color_is_palette_entry_at_id_mod_six(id in 0i128..1_000_000) {
            let config = SceneConfig::default();
            let expected = config.palette[usize::try_from(id % 6).unwrap()];
            prop_assert_eq!(config.color_for_id(id), expected);
        }
    }
}
