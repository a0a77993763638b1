#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use serde_json::{json, Value};

pub const GLB_MAGIC: u32 = 0x46546C67;
pub const GLB_CHUNK_JSON: u32 = 0x4E4F534A;
pub const GLB_CHUNK_BIN: u32 = 0x004E4942;

/// Builds GLB byte streams for tests.
pub struct GlbBuilder {
    json: Value,
    bin: Option<Vec<u8>>,
    extra: Vec<(u32, Vec<u8>)>,
}

impl GlbBuilder {
    pub fn new(json: Value) -> Self {
        Self { json, bin: None, extra: Vec::new() }
    }

    pub fn with_bin(mut self, bin: Vec<u8>) -> Self {
        self.bin = Some(bin);
        self
    }

    pub fn with_extra_chunk(mut self, chunk_type: u32, data: Vec<u8>) -> Self {
        self.extra.push((chunk_type, data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let json = serde_json::to_vec(&self.json).expect("fixture JSON serializes");

        let mut chunks = Vec::new();
        write_chunk(&mut chunks, GLB_CHUNK_JSON, &json, b' ');
        if let Some(bin) = &self.bin {
            write_chunk(&mut chunks, GLB_CHUNK_BIN, bin, 0);
        }
        for (chunk_type, data) in &self.extra {
            write_chunk(&mut chunks, *chunk_type, data, 0);
        }

        let mut out = Vec::with_capacity(12 + chunks.len());
        out.write_u32::<LittleEndian>(GLB_MAGIC).unwrap();
        out.write_u32::<LittleEndian>(2).unwrap();
        out.write_u32::<LittleEndian>((12 + chunks.len()) as u32).unwrap();
        out.extend_from_slice(&chunks);
        out
    }
}

/// Payload plus padding, with the padding counted in the chunk length.
fn write_chunk(out: &mut Vec<u8>, chunk_type: u32, data: &[u8], pad: u8) {
    let padding = (4 - data.len() % 4) % 4;
    out.write_u32::<LittleEndian>((data.len() + padding) as u32).unwrap();
    out.write_u32::<LittleEndian>(chunk_type).unwrap();
    out.extend_from_slice(data);
    out.extend(std::iter::repeat(pad).take(padding));
}

pub fn minimal_json() -> Value {
    json!({ "asset": { "version": "2.0", "generator": "fixture" } })
}

/// A document with `nodes` nodes, `meshes` meshes and `accessors` accessors,
/// all referencing each other validly.
///
/// Node `i` is named `node_i`, points at mesh `i % meshes` when there are
/// meshes, and has node `i + 1` as its only child. Every mesh has one
/// primitive whose POSITION attribute is accessor `j % accessors`.
pub fn fixture_json(nodes: usize, meshes: usize, accessors: usize) -> Value {
    let accessor_list: Vec<Value> = (0..accessors)
        .map(|k| {
            json!({
                "name": format!("accessor_{}", k),
                "componentType": 5126,
                "type": "VEC3",
                "count": k + 1,
            })
        })
        .collect();

    let mesh_list: Vec<Value> = (0..meshes)
        .map(|j| {
            let attributes = if accessors > 0 {
                json!({ "POSITION": j % accessors })
            } else {
                json!({})
            };
            json!({
                "name": format!("mesh_{}", j),
                "primitives": [{ "attributes": attributes }],
            })
        })
        .collect();

    let node_list: Vec<Value> = (0..nodes)
        .map(|i| {
            let mut node = json!({ "name": format!("node_{}", i) });
            if i + 1 < nodes {
                node["children"] = json!([i + 1]);
            }
            if meshes > 0 {
                node["mesh"] = json!(i % meshes);
            }
            node
        })
        .collect();

    let mut root = minimal_json();
    if nodes > 0 {
        root["nodes"] = Value::Array(node_list);
    }
    if meshes > 0 {
        root["meshes"] = Value::Array(mesh_list);
    }
    if accessors > 0 {
        root["accessors"] = Value::Array(accessor_list);
    }
    root
}
