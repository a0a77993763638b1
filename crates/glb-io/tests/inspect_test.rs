mod common;

use common::{fixture_json, minimal_json, GlbBuilder};
use glb_core::{DiagnosticKind, EntityKind, EntityRef};
use glb_io::{inspect_glb, GlbDocument, ReportMetadata, ReportOptions};
use serde_json::json;

fn metadata() -> ReportMetadata {
    ReportMetadata::new("fixture.glb", "16/10/2026 12:00:00")
}

fn report_for(bytes: &[u8]) -> String {
    inspect_glb(bytes, &metadata()).expect("fixture decodes")
}

fn section_headers(report: &str) -> Vec<&str> {
    report
        .lines()
        .filter(|line| !line.starts_with(' ') && line.ends_with("):"))
        .collect()
}

#[test]
fn minimal_container_has_only_header_and_summary() {
    let bytes = GlbBuilder::new(minimal_json()).build();
    let report = report_for(&bytes);

    assert!(report.starts_with("File: fixture.glb\nDate: 16/10/2026 12:00:00\n"));
    assert!(report.contains("Version: 2.0\nGenerator: fixture\n"));
    assert_eq!(section_headers(&report), ["DIAGNOSTICS (0):"]);
    assert!(report.ends_with("DIAGNOSTICS (0):\n  none\n"));
}

#[test]
fn fixture_listings_match_declared_entities() {
    for &nodes in &[0usize, 1, 5] {
        for &meshes in &[0usize, 1, 5] {
            for &accessors in &[0usize, 1, 5] {
                let bytes = GlbBuilder::new(fixture_json(nodes, meshes, accessors)).build();
                let doc = GlbDocument::from_glb(&bytes).unwrap();
                let model = doc.model();

                assert_eq!(model.nodes.len(), nodes);
                assert_eq!(model.meshes.len(), meshes);
                assert_eq!(model.accessors.len(), accessors);
                for (i, node) in model.nodes.iter().enumerate() {
                    assert_eq!(node.name.as_deref(), Some(format!("node_{}", i).as_str()));
                }
                for (j, mesh) in model.meshes.iter().enumerate() {
                    assert_eq!(mesh.name.as_deref(), Some(format!("mesh_{}", j).as_str()));
                }
                for (k, accessor) in model.accessors.iter().enumerate() {
                    assert_eq!(accessor.count, Some(k + 1));
                }

                let inspection = doc.resolve();
                assert!(
                    inspection.diagnostics.is_empty(),
                    "unexpected diagnostics for ({}, {}, {}): {:?}",
                    nodes,
                    meshes,
                    accessors,
                    inspection.diagnostics
                );

                let report = inspection.render(&metadata(), &ReportOptions::default());
                let node_lines: Vec<&str> = report
                    .lines()
                    .filter(|l| l.starts_with("  > node_"))
                    .collect();
                assert_eq!(node_lines.len(), nodes);
                for (i, line) in node_lines.iter().enumerate() {
                    assert!(line.starts_with(&format!("  > node_{} (index {})", i, i)));
                }
                let mesh_lines: Vec<&str> =
                    report.lines().filter(|l| l.starts_with("  > Mesh ")).collect();
                assert_eq!(mesh_lines.len(), meshes);
                for (j, line) in mesh_lines.iter().enumerate() {
                    assert_eq!(*line, format!("  > Mesh {}: mesh_{}", j, j));
                }
                let accessor_lines: Vec<&str> =
                    report.lines().filter(|l| l.starts_with("  > Accessor ")).collect();
                assert_eq!(accessor_lines.len(), accessors);
                for (k, line) in accessor_lines.iter().enumerate() {
                    assert!(line.starts_with(&format!("  > Accessor {} \"accessor_{}\":", k, k)));
                    assert!(line.ends_with(&format!("count: {}", k + 1)));
                }

                assert_eq!(report.contains("NODES ("), nodes > 0);
                assert_eq!(report.contains("MESHES ("), meshes > 0);
                assert_eq!(report.contains("ACCESSORS ("), accessors > 0);
            }
        }
    }
}

#[test]
fn dangling_indices_reported_once_and_other_primitives_render() {
    let json = json!({
        "asset": { "version": "2.0" },
        "accessors": [
            { "componentType": 5126, "type": "VEC3", "count": 3 },
            { "componentType": 5126, "type": "VEC3", "count": 3 },
            { "componentType": 5123, "type": "SCALAR", "count": 3 }
        ],
        "meshes": [{
            "primitives": [
                { "attributes": { "POSITION": 0 }, "indices": 99 },
                { "attributes": { "POSITION": 1, "NORMAL": 0 }, "indices": 2 }
            ]
        }]
    });
    let bytes = GlbBuilder::new(json).build();
    let doc = GlbDocument::from_glb(&bytes).unwrap();
    let inspection = doc.resolve();

    let diags: Vec<_> = inspection.diagnostics.iter().collect();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].source, EntityRef::Primitive { mesh: 0, primitive: 0 });
    assert_eq!(diags[0].field, "indices");
    assert_eq!(
        diags[0].kind,
        DiagnosticKind::DanglingReference {
            target: EntityKind::Accessor,
            index: 99,
            available: 3,
        }
    );

    let report = inspection.render(&metadata(), &ReportOptions::default());
    assert!(report.contains("* Indices: [ERROR: accessor 99 does not exist]"));
    assert!(report.contains(
        "    - Primitive 1:\n        * Attribute: NORMAL (accessor 0)\n          type: VEC3, componentType: FLOAT (5126), count: 3\n        * Attribute: POSITION (accessor 1)\n"
    ));
    assert!(report.contains(
        "        * Indices: accessor 2\n          type: SCALAR, componentType: UNSIGNED_SHORT (5123), count: 3\n"
    ));
}

#[test]
fn dangling_attribute_names_semantic() {
    let json = json!({
        "asset": { "version": "2.0" },
        "accessors": [{ "componentType": 5126, "type": "VEC2", "count": 1 }],
        "meshes": [{ "primitives": [{ "attributes": { "TEXCOORD_0": 99 } }] }]
    });
    let doc = GlbDocument::from_glb(&GlbBuilder::new(json).build()).unwrap();
    let inspection = doc.resolve();

    assert_eq!(inspection.diagnostics.len(), 1);
    let d = &inspection.diagnostics.as_slice()[0];
    assert_eq!(d.field, "attributes.TEXCOORD_0");
    assert!(matches!(d.kind, DiagnosticKind::DanglingReference { index: 99, .. }));
}

#[test]
fn two_node_cycle_reported_once_and_both_nodes_listed() {
    let json = json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1] }, { "children": [0] }]
    });
    let doc = GlbDocument::from_glb(&GlbBuilder::new(json).build()).unwrap();
    let inspection = doc.resolve();

    let cycles: Vec<_> = inspection
        .diagnostics
        .iter()
        .filter(|d| matches!(d.kind, DiagnosticKind::GraphCycle { .. }))
        .collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].kind, DiagnosticKind::GraphCycle { path: vec![0, 1] });
    assert_eq!(inspection.diagnostics.len(), 1);

    let report = inspection.render(&metadata(), &ReportOptions::default());
    assert!(report.contains("NODES (2):"));
    assert!(report.contains("  > Node 0 (index 0) -> children: [1]"));
    assert!(report.contains("  > Node 1 (index 1) -> children: [0 (cycle)]"));
}

#[test]
fn bad_magic_is_fatal() {
    let mut bytes = GlbBuilder::new(minimal_json()).build();
    bytes[0..4].copy_from_slice(b"GLTF");

    let err = inspect_glb(&bytes, &metadata()).unwrap_err();
    assert!(err.is_malformed());
    assert!(GlbDocument::from_glb(&bytes).is_err());
}

#[test]
fn invalid_json_is_fatal() {
    let mut bytes = GlbBuilder::new(minimal_json()).build();
    // First byte of the JSON payload.
    bytes[20] = b'[';
    bytes[21] = b'!';

    let err = GlbDocument::from_glb(&bytes).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn rendering_is_deterministic() {
    let json = json!({
        "asset": { "version": "2.0" },
        "accessors": [{ "componentType": 5126, "type": "VEC3", "count": 2, "min": [0.5, 0, -1], "max": [1, 2, 3] }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0, "_CUSTOM": 0, "NORMAL": 7 } }] }],
        "nodes": [{ "mesh": 0, "children": [1] }, { "children": [0, 5] }],
        "animations": [{
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "rotation" } }],
            "samplers": [{ "input": 0, "output": 0, "interpolation": "STEP" }]
        }]
    });
    let bytes = GlbBuilder::new(json).build();

    let first = report_for(&bytes);
    let second = report_for(&bytes);
    assert_eq!(first, second);

    let doc = GlbDocument::from_glb(&bytes).unwrap();
    let options = ReportOptions::default();
    assert_eq!(
        doc.render_report(&metadata(), &options),
        doc.render_report(&metadata(), &options)
    );
}

#[test]
fn extra_chunk_is_ignored_with_diagnostic() {
    let json = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4 }]
    });
    let bytes = GlbBuilder::new(json)
        .with_bin(vec![1, 2, 3, 4])
        .with_extra_chunk(0x5458_4554, vec![9; 6])
        .build();
    let doc = GlbDocument::from_glb(&bytes).unwrap();

    assert_eq!(doc.model().buffers[0].data.as_deref(), Some(&[1u8, 2, 3, 4][..]));
    let diags = doc.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.as_slice()[0].source, EntityRef::Container);
    assert!(matches!(
        diags.as_slice()[0].kind,
        DiagnosticKind::UnsupportedExtraChunk { chunk_type: 0x5458_4554, length: 8 }
    ));

    let report = doc.render_report(&metadata(), &ReportOptions::default());
    assert!(report.contains("  ! UnsupportedExtraChunk [chunks[2]]:"));
    assert!(report.contains("  > Buffer 0: byteLength 4, source: embedded BIN chunk (4 bytes)"));
}

#[test]
fn external_buffer_marked_unsupported() {
    let json = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 16, "uri": "scene.bin" }],
        "bufferViews": [{ "buffer": 0, "byteLength": 16 }]
    });
    let doc = GlbDocument::from_glb(&GlbBuilder::new(json).build()).unwrap();
    let inspection = doc.resolve();

    assert_eq!(inspection.diagnostics.len(), 1);
    assert_eq!(
        inspection.diagnostics.as_slice()[0].kind,
        DiagnosticKind::UnsupportedBufferSource { uri: "scene.bin".to_string() }
    );
    assert!(doc.model().buffers[0].data.is_none());

    let report = inspection.render(&metadata(), &ReportOptions::default());
    assert!(report.contains("source: external 'scene.bin' (not loaded)"));
    assert!(report.contains("  > BufferView 0: buffer 0, byteOffset 0, byteLength 16"));
}

#[test]
fn schema_violation_keeps_rest_of_report() {
    let json = json!({
        "asset": { "version": "2.0" },
        "accessors": [
            { "type": "VEC3", "count": 3 },
            { "componentType": 5126, "type": "VEC4", "count": 1 }
        ],
        "materials": [{ "name": "Steel" }]
    });
    let report = report_for(&GlbBuilder::new(json).build());

    assert!(report.contains(
        "  > Accessor 0: type: VEC3, componentType: <missing>, count: 3 [incomplete]\n    ! SchemaViolation [componentType]:"
    ));
    assert!(report.contains("  > Accessor 1: type: VEC4, componentType: FLOAT (5126), count: 1\n"));
    assert!(report.contains("MATERIALS (1):\n  > Material 0: Steel\n"));
    assert!(report.contains("DIAGNOSTICS (1):\n  1. SchemaViolation at accessor 0 [componentType]"));
}

#[test]
fn count_exceeding_buffer_view_reports_both_counts() {
    let json = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 24 }],
        "bufferViews": [{ "buffer": 0, "byteLength": 24 }],
        "accessors": [{ "bufferView": 0, "componentType": 5126, "type": "VEC3", "count": 3 }]
    });
    let bytes = GlbBuilder::new(json).with_bin(vec![0; 24]).build();
    let inspection_doc = GlbDocument::from_glb(&bytes).unwrap();
    let inspection = inspection_doc.resolve();

    assert_eq!(inspection.diagnostics.len(), 1);
    let d = &inspection.diagnostics.as_slice()[0];
    assert_eq!(d.source, EntityRef::Accessor(0));
    assert_eq!(d.field, "count");
    assert!(d.detail.contains("declared count 3"));
    assert!(d.detail.contains("holds 2 elements"));
}

#[test]
fn open_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.glb");
    std::fs::write(&path, GlbBuilder::new(fixture_json(2, 1, 1)).build()).unwrap();

    let doc = GlbDocument::open(&path).unwrap();
    assert_eq!(doc.model().nodes.len(), 2);
    assert!(doc.diagnostics().is_empty());

    let err = GlbDocument::open(dir.path().join("absent.glb")).unwrap_err();
    assert!(!err.is_malformed());
}
