//! Input records decoded from the object-graph and camera-pose documents.

use std::path::Path;

use glam::DVec3;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CgvizError, Result};

/// One object of the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Object id, used to pick the palette color. Any JSON integer is
    /// accepted, including unsigned values above `i64::MAX`.
    pub id: i128,
    /// Bounding box center.
    pub bbox_center: [f64; 3],
    /// Bounding box half-extents.
    pub bbox_extent: [f64; 3],
    /// Optional semantic tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_tag: Option<String>,
}

impl ObjectRecord {
    /// Returns the center as a vector.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        DVec3::from_array(self.bbox_center)
    }

    /// Returns the half-extents as a vector.
    #[must_use]
    pub fn extent(&self) -> DVec3 {
        DVec3::from_array(self.bbox_extent)
    }
}

/// A not-yet-decoded object-graph entry.
///
/// Entries are decoded one by one so that a malformed record can be skipped
/// without losing the rest of the document.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    /// The key of the entry (or `objects[i]` for the list layout).
    pub key: String,
    /// The raw JSON value.
    pub value: Value,
}

impl ObjectEntry {
    /// Returns the integer `id` field, if present.
    #[must_use]
    pub fn id(&self) -> Option<i128> {
        let id = self.value.get("id")?;
        id.as_i64()
            .map(i128::from)
            .or_else(|| id.as_u64().map(i128::from))
    }

    /// Decodes the entry into an [`ObjectRecord`].
    pub fn decode(&self) -> Result<ObjectRecord> {
        ObjectRecord::deserialize(&self.value).map_err(|e| CgvizError::InvalidRecord {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }
}

/// The object-graph document, with entries in file order.
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    entries: Vec<ObjectEntry>,
}

impl ObjectGraph {
    /// Builds the graph from a parsed JSON value.
    ///
    /// Two layouts are accepted: a mapping from arbitrary key to record, or a
    /// mapping whose `objects` key holds an array of records.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(CgvizError::InvalidRecord {
                key: "<root>".to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };

        let entries = if let Some(Value::Array(objects)) = map.get_mut("objects") {
            std::mem::take(objects)
                .into_iter()
                .enumerate()
                .map(|(i, value)| ObjectEntry {
                    key: format!("objects[{i}]"),
                    value,
                })
                .collect()
        } else {
            map.into_iter()
                .map(|(key, value)| ObjectEntry { key, value })
                .collect()
        };

        Ok(Self { entries })
    }

    /// Parses the graph from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Reads and parses the graph from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let graph = Self::from_json_str(&text)?;
        log::info!(
            "loaded {} object entries from {}",
            graph.len(),
            path.display()
        );
        Ok(graph)
    }

    /// Returns the entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the graph has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Camera position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CameraPosition {
    /// Returns the position as a vector.
    #[must_use]
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// Camera orientation as yaw/pitch/roll in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraOrientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// One camera pose.
///
/// A record holding `translation` or `rotation_matrix` is read in the matrix
/// layout; anything else is read in the Euler layout, so decode errors name
/// the missing field of the layout the record was meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CameraRecord {
    /// Position plus yaw/pitch/roll angles in degrees.
    Euler {
        camera_position: CameraPosition,
        camera_orientation: CameraOrientation,
    },
    /// Translation plus a row-major camera-to-world rotation matrix.
    Matrix {
        translation: [f64; 3],
        rotation_matrix: [[f64; 3]; 3],
    },
}

impl CameraRecord {
    /// Returns the camera position in world coordinates.
    #[must_use]
    pub fn position(&self) -> DVec3 {
        match self {
            CameraRecord::Euler {
                camera_position, ..
            } => camera_position.to_dvec3(),
            CameraRecord::Matrix { translation, .. } => DVec3::from_array(*translation),
        }
    }
}

#[derive(Deserialize)]
struct EulerLayout {
    camera_position: CameraPosition,
    camera_orientation: CameraOrientation,
}

#[derive(Deserialize)]
struct MatrixLayout {
    translation: [f64; 3],
    rotation_matrix: [[f64; 3]; 3],
}

impl<'de> Deserialize<'de> for CameraRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let is_matrix = value.get("translation").is_some() || value.get("rotation_matrix").is_some();

        if is_matrix {
            let MatrixLayout {
                translation,
                rotation_matrix,
            } = MatrixLayout::deserialize(&value).map_err(de::Error::custom)?;
            Ok(CameraRecord::Matrix {
                translation,
                rotation_matrix,
            })
        } else {
            let EulerLayout {
                camera_position,
                camera_orientation,
            } = EulerLayout::deserialize(&value).map_err(de::Error::custom)?;
            Ok(CameraRecord::Euler {
                camera_position,
                camera_orientation,
            })
        }
    }
}

/// The camera-pose document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPoses {
    /// Camera records in file order. A missing key means no cameras.
    #[serde(default)]
    pub cameras: Vec<CameraRecord>,
}

#[derive(Deserialize)]
struct RawCameraPoses {
    #[serde(default)]
    cameras: Vec<Value>,
}

impl CameraPoses {
    /// Parses the poses from JSON text.
    ///
    /// A malformed camera fails the whole document with
    /// [`CgvizError::InvalidRecord`] keyed `cameras[i]`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawCameraPoses = serde_json::from_str(text)?;
        let cameras = raw
            .cameras
            .iter()
            .enumerate()
            .map(|(i, value)| {
                CameraRecord::deserialize(value).map_err(|e| CgvizError::InvalidRecord {
                    key: format!("cameras[{i}]"),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { cameras })
    }

    /// Reads and parses the poses from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let poses = Self::from_json_str(&text)?;
        log::info!(
            "loaded {} camera poses from {}",
            poses.cameras.len(),
            path.display()
        );
        Ok(poses)
    }
}
