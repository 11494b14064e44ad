//! Scene building: input documents in, ordered geometry out.

use cgviz_core::{
    CameraPoses, Geometry, ObjectEntry, ObjectGraph, Result, SceneConfig, SceneRenderer,
};
use cgviz_structures::{BoxBuilder, CameraPose, FrustumBuilder};

/// An object record that was left out of the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Key of the record in the object graph.
    pub key: String,
    /// Object id, when it could be read.
    pub id: Option<i128>,
    /// Why the record was skipped.
    pub reason: String,
}

/// Summary of one scene build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of boxes built.
    pub boxes: usize,
    /// Records that were skipped, in file order.
    pub skipped: Vec<SkippedRecord>,
    /// Number of frustums built.
    pub frustums: usize,
}

impl BuildReport {
    /// Total number of geometries handed to the renderer.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.boxes + self.frustums
    }
}

/// Builds one box per object record, in record order.
///
/// Records that fail to decode or build are logged and returned in the
/// skipped list instead of aborting the build.
pub fn build_boxes(
    graph: &ObjectGraph,
    config: &SceneConfig,
) -> (Vec<Geometry>, Vec<SkippedRecord>) {
    let builder = BoxBuilder::from_config(config);
    let mut boxes = Vec::with_capacity(graph.len());
    let mut skipped = Vec::new();

    for entry in graph.entries() {
        match build_box(&builder, entry, config) {
            Ok(geometry) => boxes.push(geometry),
            Err(err) => {
                let id = entry.id();
                match id {
                    Some(id) => log::warn!("skipping object {id}: {err}"),
                    None => log::warn!("skipping record '{}': {err}", entry.key),
                }
                skipped.push(SkippedRecord {
                    key: entry.key.clone(),
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    (boxes, skipped)
}

fn build_box(builder: &BoxBuilder, entry: &ObjectEntry, config: &SceneConfig) -> Result<Geometry> {
    let record = entry.decode()?;
    let color = config.color_for_id(record.id);
    let mut mesh = builder.build(record.center(), record.extent(), color)?;
    mesh.label = Some(
        record
            .object_tag
            .clone()
            .unwrap_or_else(|| format!("object {}", record.id)),
    );
    log::debug!(
        "object {} -> box at {:?} with half extent {:?}",
        record.id,
        mesh.translation,
        mesh.half_extent
    );
    Ok(mesh.into())
}

/// Builds one frustum per camera record, in record order.
pub fn build_frustums(poses: &CameraPoses, config: &SceneConfig) -> Vec<Geometry> {
    let builder = FrustumBuilder::from_config(config);
    poses
        .cameras
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let pose = CameraPose::from_record(record);
            let mut lines = builder.build(&pose);
            lines.label = Some(format!("camera {i}"));
            log::debug!("camera {i} -> frustum at {:?}", pose.position);
            Geometry::from(lines)
        })
        .collect()
}

/// Builds the full geometry sequence: boxes first, then frustums.
pub fn build_scene(
    graph: &ObjectGraph,
    poses: &CameraPoses,
    config: &SceneConfig,
) -> (Vec<Geometry>, BuildReport) {
    let (mut geometries, skipped) = build_boxes(graph, config);
    let boxes = geometries.len();
    let frustums = build_frustums(poses, config);
    let report = BuildReport {
        boxes,
        skipped,
        frustums: frustums.len(),
    };
    geometries.extend(frustums);
    (geometries, report)
}

/// Loads both input documents, builds the scene and hands it to `renderer`.
///
/// Missing or malformed input files are fatal. Individual object records that
/// cannot be used are skipped and listed in the returned report.
pub fn run(config: &SceneConfig, renderer: &mut dyn SceneRenderer) -> Result<BuildReport> {
    let graph = ObjectGraph::load(&config.object_graph_path)?;
    let poses = CameraPoses::load(&config.camera_poses_path)?;

    let (geometries, report) = build_scene(&graph, &poses, config);
    log::info!(
        "built {} boxes ({} skipped) and {} frustums",
        report.boxes,
        report.skipped.len(),
        report.frustums
    );

    renderer.render(&geometries)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgviz_core::DebugTextRenderer;
    use proptest::prelude::*;

    fn sample_graph() -> ObjectGraph {
        ObjectGraph::from_json_str(
            r#"{
                "a": {"id": 7, "bbox_center": [1, 2, 3], "bbox_extent": [0.5, 0.5, 0.5]},
                "b": {"id": 2, "bbox_center": [0, 0, 0], "bbox_extent": [0, 0, 0], "object_tag": "chair"}
            }"#,
        )
        .expect("graph")
    }

    #[test]
    fn test_boxes_follow_record_order() {
        let config = SceneConfig::default();
        let (boxes, skipped) = build_boxes(&sample_graph(), &config);
        assert!(skipped.is_empty());
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].label(), Some("object 7"));
        assert_eq!(boxes[1].label(), Some("chair"));
        let first = boxes[0].as_box().expect("box");
        assert_eq!(first.color, config.palette[1]);
    }

    #[test]
    fn test_unsigned_id_beyond_i64_gets_palette_color() {
        let graph = ObjectGraph::from_json_str(
            r#"{"big": {"id": 18446744073709551615, "bbox_center": [0, 0, 0], "bbox_extent": [1, 1, 1]}}"#,
        )
        .expect("graph");
        let config = SceneConfig::default();
        let (boxes, skipped) = build_boxes(&graph, &config);
        assert!(skipped.is_empty(), "{skipped:?}");
        assert_eq!(boxes.len(), 1);
        // u64::MAX mod 6 == 3
        assert_eq!(boxes[0].as_box().expect("box").color, config.palette[3]);
        assert_eq!(boxes[0].label(), Some("object 18446744073709551615"));
    }

    #[test]
    fn test_frustum_labels() {
        let poses = CameraPoses::from_json_str(
            r#"{"cameras": [
                {"camera_position": {"x": 0, "y": 0, "z": 0},
                 "camera_orientation": {"yaw": 0, "pitch": 0, "roll": 0}},
                {"camera_position": {"x": 1, "y": 0, "z": 0},
                 "camera_orientation": {"yaw": 90, "pitch": 0, "roll": 0}}
            ]}"#,
        )
        .expect("poses");
        let frustums = build_frustums(&poses, &SceneConfig::default());
        assert_eq!(frustums.len(), 2);
        assert_eq!(frustums[1].label(), Some("camera 1"));
        assert_eq!(frustums[1].type_name(), "LineSet");
    }

    #[test]
    fn test_scene_puts_boxes_before_frustums() {
        let poses = CameraPoses::from_json_str(
            r#"{"cameras": [{"camera_position": {"x": 0, "y": 0, "z": 0},
                            "camera_orientation": {"yaw": 0, "pitch": 0, "roll": 0}}]}"#,
        )
        .expect("poses");
        let (geometries, report) = build_scene(&sample_graph(), &poses, &SceneConfig::default());
        assert_eq!(report.boxes, 2);
        assert_eq!(report.frustums, 1);
        assert_eq!(report.geometry_count(), geometries.len());
        let kinds: Vec<_> = geometries.iter().map(Geometry::type_name).collect();
        assert_eq!(kinds, ["BoxMesh", "BoxMesh", "LineSet"]);

        let mut renderer = DebugTextRenderer::new();
        renderer.render(&geometries).expect("render");
        assert!(renderer.output().contains("[2] LineSet 'camera 0'"));
    }

    proptest! {
        #[test]
        fn prop_every_record_is_built_or_skipped(
            ids in proptest::collection::vec(-1000i128..1000, 0..20),
            drop_center in proptest::collection::vec(any::<bool>(), 20),
        ) {
            let mut text = String::from("{");
            for (i, id) in ids.iter().enumerate() {
                if i > 0 {
                    text.push(',');
                }
                let center = if drop_center[i] { "" } else { r#""bbox_center": [0, 0, 0], "# };
                text.push_str(&format!(
                    r#""k{i}": {{"id": {id}, {center}"bbox_extent": [1, 1, 1]}}"#
                ));
            }
            text.push('}');

            let config = SceneConfig::default();
            let graph = ObjectGraph::from_json_str(&text).expect("graph");
            let (boxes, skipped) = build_boxes(&graph, &config);
            prop_assert_eq!(boxes.len() + skipped.len(), ids.len());

            let kept = ids.iter().zip(&drop_center).filter(|(_, dropped)| !**dropped);
            for (geometry, (id, _)) in boxes.iter().zip(kept) {
                let mesh = geometry.as_box().expect("box");
                prop_assert_eq!(mesh.color, config.color_for_id(*id));
            }
        }
    }
}
