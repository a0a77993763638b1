mod common;

use common::{minimal_json, GlbBuilder};
use glb_core::DiagnosticKind;
use glb_io::{decode_container, GlbDocument, ReportMetadata, ReportOptions};
use proptest::prelude::*;
use serde_json::{json, Value};

fn node_graph(children: &[Vec<usize>]) -> Value {
    let nodes: Vec<Value> = children.iter().map(|c| json!({ "children": c })).collect();
    let mut root = minimal_json();
    root["nodes"] = Value::Array(nodes);
    root
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_container(&bytes);
        let _ = GlbDocument::from_glb(&bytes);
    }

    #[test]
    fn corrupted_valid_container_never_panics(
        position in 0usize..64,
        value in any::<u8>(),
    ) {
        let mut bytes = GlbBuilder::new(json!({
            "asset": { "version": "2.0" },
            "nodes": [{ "children": [1] }, {}]
        }))
        .build();
        let index = position % bytes.len();
        bytes[index] = value;

        if let Ok(doc) = GlbDocument::from_glb(&bytes) {
            let inspection = doc.resolve();
            let metadata = ReportMetadata::new("fuzz.glb", "now");
            let report = inspection.render(&metadata, &ReportOptions::default());
            prop_assert!(report.contains("DIAGNOSTICS ("));
        }
    }

    #[test]
    fn arbitrary_node_graphs_resolve(
        children in proptest::collection::vec(
            proptest::collection::vec(0usize..10, 0..4),
            1..10,
        )
    ) {
        let bytes = GlbBuilder::new(node_graph(&children)).build();
        let doc = GlbDocument::from_glb(&bytes).unwrap();
        let inspection = doc.resolve();
        let count = children.len();

        for d in inspection.diagnostics.iter() {
            match &d.kind {
                DiagnosticKind::GraphCycle { path } => {
                    prop_assert!(!path.is_empty());
                    prop_assert!(path.iter().all(|&n| n < count));
                    // The last node on the path links back to the first.
                    let last = path[path.len() - 1];
                    prop_assert!(children[last].contains(&path[0]));
                }
                DiagnosticKind::DanglingReference { index, available, .. } => {
                    prop_assert!(*index >= *available);
                }
                // Repeated child indices.
                DiagnosticKind::SchemaViolation => {
                    prop_assert_eq!(d.field.as_str(), "children");
                }
                other => prop_assert!(false, "unexpected diagnostic {:?}", other),
            }
        }

        let has_self_loop = children.iter().enumerate().any(|(i, c)| c.contains(&i));
        if has_self_loop {
            let has_cycle = inspection
                .diagnostics
                .iter()
                .any(|d| matches!(d.kind, DiagnosticKind::GraphCycle { .. }));
            prop_assert!(has_cycle);
        }

        let metadata = ReportMetadata::new("graph.glb", "now");
        let report = inspection.render(&metadata, &ReportOptions::default());
        let expected = format!("NODES ({}):", count);
        prop_assert!(report.contains(&expected));
    }
}
