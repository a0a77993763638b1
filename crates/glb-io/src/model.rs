//! glTF scene-graph model decoded from the JSON chunk.
//!
//! Each entity is decoded independently from a generic JSON value tree. A
//! missing or mistyped required field produces a `SchemaViolation` for that
//! entity only; the entity is still added to the model with `complete` set
//! to `false` and the remaining entities are decoded as usual.
//!
//! Index fields are stored exactly as written. Whether they point at
//! something is decided later by the [resolver](crate::resolver).

use std::collections::{BTreeMap, HashSet};

use glb_core::{AccessorType, ComponentType, Diagnostic, Diagnostics, EntityRef, GlbError, Result};
use log::{debug, trace};
use serde_json::{Map, Value};

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    pub version: Option<String>,
    pub generator: Option<String>,
    pub copyright: Option<String>,
    pub min_version: Option<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    pub name: Option<String>,
    pub byte_length: Option<usize>,
    pub uri: Option<String>,
    /// Embedded content; `None` for URI buffers and unresolvable sources.
    pub data: Option<Vec<u8>>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferView {
    pub name: Option<String>,
    pub buffer: Option<usize>,
    pub byte_offset: usize,
    pub byte_length: Option<usize>,
    pub byte_stride: Option<usize>,
    pub target: Option<u32>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessor {
    pub name: Option<String>,
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub component_type: Option<ComponentType>,
    pub normalized: bool,
    pub accessor_type: Option<AccessorType>,
    pub count: Option<usize>,
    pub min: Option<Vec<f64>>,
    pub max: Option<Vec<f64>>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    /// Semantic name (`POSITION`, `TEXCOORD_0`, `_CUSTOM`, ...) to accessor index.
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub mode: Option<u32>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

impl Interpolation {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "LINEAR" => Some(Interpolation::Linear),
            "STEP" => Some(Interpolation::Step),
            "CUBICSPLINE" => Some(Interpolation::CubicSpline),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Interpolation::Linear => "LINEAR",
            Interpolation::Step => "STEP",
            Interpolation::CubicSpline => "CUBICSPLINE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSampler {
    pub input: Option<usize>,
    pub output: Option<usize>,
    /// `None` when the document names an unknown interpolation.
    pub interpolation: Option<Interpolation>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationChannel {
    pub sampler: Option<usize>,
    pub target_node: Option<usize>,
    pub target_path: Option<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: Option<String>,
    pub channels: Vec<AnimationChannel>,
    pub samplers: Vec<AnimationSampler>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub name: Option<String>,
    pub nodes: Vec<usize>,
    pub complete: bool,
}

/// The decoded document. Built once by [`build_model`] and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub asset: Asset,
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<Node>,
    pub animations: Vec<Animation>,
    pub scenes: Vec<Scene>,
    /// Default scene index.
    pub scene: Option<usize>,
}

const ANIMATION_PATHS: [&str; 4] = ["translation", "rotation", "scale", "weights"];

// ============================================================================
// Field decoding
// ============================================================================

/// Reads the fields of one JSON object on behalf of one entity.
///
/// Findings are buffered and handed to the shared list by [`Fields::finish`],
/// so nested objects (primitives, channel targets) can be decoded with their
/// own `Fields` and merged back in order.
struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    source: EntityRef,
    prefix: &'static str,
    pending: Vec<Diagnostic>,
    complete: bool,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, source: EntityRef) -> Self {
        Self::with_prefix(value, source, "")
    }

    fn with_prefix(value: &'a Value, source: EntityRef, prefix: &'static str) -> Self {
        let mut fields = Self {
            object: value.as_object(),
            source,
            prefix,
            pending: Vec::new(),
            complete: true,
        };
        if fields.object.is_none() {
            let field = match prefix.trim_end_matches('.') {
                "" => "value".to_string(),
                nested => nested.to_string(),
            };
            fields.violation_at(
                field,
                format!("expected a JSON object, found {}", json_type(value)),
            );
        }
        fields
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.and_then(|o| o.get(key))
    }

    fn field(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn violation(&mut self, key: &str, detail: impl Into<String>) {
        let field = self.field(key);
        self.violation_at(field, detail);
    }

    fn violation_at(&mut self, field: String, detail: impl Into<String>) {
        self.pending
            .push(Diagnostic::schema_violation(self.source, field, detail));
        self.complete = false;
    }

    /// Records a finding that does not make the entity incomplete.
    fn note(&mut self, diagnostic: Diagnostic) {
        self.pending.push(diagnostic);
    }

    fn missing(&mut self, key: &str) {
        self.violation(key, "required field missing");
    }

    fn uint(&mut self, key: &str, required: bool) -> Option<usize> {
        match self.get(key) {
            None => {
                if required {
                    self.missing(key);
                }
                None
            }
            Some(value) => {
                let parsed = as_uint(value);
                if parsed.is_none() {
                    self.violation(
                        key,
                        format!("expected a non-negative integer, found {}", describe(value)),
                    );
                }
                parsed
            }
        }
    }

    /// Optional enum code; values outside `known` are reported and dropped.
    fn optional_code(&mut self, key: &str, what: &str, known: impl Fn(u32) -> bool) -> Option<u32> {
        let raw = self.optional_uint(key)?;
        match u32::try_from(raw) {
            Ok(code) if known(code) => Some(code),
            _ => {
                self.violation(key, format!("unknown {} {}", what, raw));
                None
            }
        }
    }

    fn required_uint(&mut self, key: &str) -> Option<usize> {
        self.uint(key, true)
    }

    fn optional_uint(&mut self, key: &str) -> Option<usize> {
        self.uint(key, false)
    }

    fn string(&mut self, key: &str, required: bool) -> Option<String> {
        match self.get(key) {
            None => {
                if required {
                    self.missing(key);
                }
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(value) => {
                self.violation(key, format!("expected a string, found {}", json_type(value)));
                None
            }
        }
    }

    fn required_string(&mut self, key: &str) -> Option<String> {
        self.string(key, true)
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        self.string(key, false)
    }

    fn optional_bool(&mut self, key: &str) -> Option<bool> {
        match self.get(key) {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(value) => {
                self.violation(key, format!("expected a boolean, found {}", json_type(value)));
                None
            }
        }
    }

    fn optional_numbers(&mut self, key: &str) -> Option<Vec<f64>> {
        let items = self.array(key, false)?;
        let mut numbers = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_f64() {
                Some(n) => numbers.push(n),
                None => {
                    self.violation(
                        &format!("{}[{}]", key, i),
                        format!("expected a number, found {}", json_type(item)),
                    );
                    return None;
                }
            }
        }
        Some(numbers)
    }

    /// Index list; malformed elements are reported and skipped.
    fn uint_list(&mut self, key: &str) -> Vec<usize> {
        let Some(items) = self.array(key, false) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match as_uint(item) {
                Some(index) => out.push(index),
                None => self.violation(
                    &format!("{}[{}]", key, i),
                    format!("expected a non-negative integer, found {}", describe(item)),
                ),
            }
        }
        out
    }

    fn array(&mut self, key: &str, required: bool) -> Option<&'a [Value]> {
        match self.get(key) {
            None => {
                if required {
                    self.missing(key);
                }
                None
            }
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(value) => {
                self.violation(key, format!("expected an array, found {}", json_type(value)));
                None
            }
        }
    }

    fn object(&mut self, key: &str, required: bool) -> Option<&'a Value> {
        match self.get(key) {
            None => {
                if required {
                    self.missing(key);
                }
                None
            }
            Some(value @ Value::Object(_)) => Some(value),
            Some(value) => {
                self.violation(key, format!("expected an object, found {}", json_type(value)));
                None
            }
        }
    }

    /// Folds a nested reader's findings into this one.
    fn absorb(&mut self, nested: Fields<'_>) {
        self.complete &= nested.complete;
        self.pending.extend(nested.pending);
    }

    /// Flushes buffered findings; returns whether the entity is complete.
    fn finish(self, diagnostics: &mut Diagnostics) -> bool {
        for diagnostic in self.pending {
            diagnostics.push(diagnostic);
        }
        self.complete
    }
}

fn as_uint(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|v| usize::try_from(v).ok())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => json_type(other).to_string(),
    }
}

/// Top-level collection `key`, or an empty slice if absent or not an array.
fn collection<'a>(root: &'a Map<String, Value>, key: &str, diagnostics: &mut Diagnostics) -> &'a [Value] {
    match root.get(key) {
        None => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(value) => {
            diagnostics.push(Diagnostic::schema_violation(
                EntityRef::Root,
                key,
                format!("expected an array, found {}; treated as empty", json_type(value)),
            ));
            &[]
        }
    }
}

// ============================================================================
// Model construction
// ============================================================================

/// Decode the JSON chunk into a [`Model`].
///
/// `embedded_binary` is the BIN chunk payload, used as the content of buffer
/// 0 when that buffer declares no URI.
///
/// # Errors
///
/// Returns `GlbError::MalformedContainer` only if the text is not valid JSON
/// or its root is not an object. Every other problem becomes a diagnostic.
pub fn build_model(json_text: &str, embedded_binary: Option<&[u8]>) -> Result<(Model, Diagnostics)> {
    let root: Value = serde_json::from_str(json_text)
        .map_err(|e| GlbError::malformed(format!("JSON chunk is not valid JSON: {}", e)))?;
    let root = root.as_object().ok_or_else(|| {
        GlbError::malformed(format!(
            "JSON chunk root must be an object, found {}",
            json_type(&root)
        ))
    })?;

    let mut diagnostics = Diagnostics::new();

    let asset = decode_asset(root.get("asset"), &mut diagnostics);

    let buffers = collection(root, "buffers", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_buffer(i, v, embedded_binary, &mut diagnostics))
        .collect();
    let buffer_views = collection(root, "bufferViews", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_buffer_view(i, v, &mut diagnostics))
        .collect();
    let accessors = collection(root, "accessors", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_accessor(i, v, &mut diagnostics))
        .collect();
    let materials = collection(root, "materials", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_material(i, v, &mut diagnostics))
        .collect();
    let meshes = collection(root, "meshes", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_mesh(i, v, &mut diagnostics))
        .collect();
    let nodes = collection(root, "nodes", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_node(i, v, &mut diagnostics))
        .collect();
    let animations = collection(root, "animations", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_animation(i, v, &mut diagnostics))
        .collect();
    let scenes = collection(root, "scenes", &mut diagnostics)
        .iter()
        .enumerate()
        .map(|(i, v)| decode_scene(i, v, &mut diagnostics))
        .collect();

    let scene = match root.get("scene") {
        None => None,
        Some(value) => {
            let parsed = as_uint(value);
            if parsed.is_none() {
                diagnostics.push(Diagnostic::schema_violation(
                    EntityRef::Root,
                    "scene",
                    format!("expected a non-negative integer, found {}", describe(value)),
                ));
            }
            parsed
        }
    };

    let model = Model {
        asset,
        buffers,
        buffer_views,
        accessors,
        materials,
        meshes,
        nodes,
        animations,
        scenes,
        scene,
    };
    debug!(
        "Decoded model: {} nodes, {} meshes, {} accessors, {} materials, {} animations, {} diagnostics",
        model.nodes.len(),
        model.meshes.len(),
        model.accessors.len(),
        model.materials.len(),
        model.animations.len(),
        diagnostics.len()
    );

    Ok((model, diagnostics))
}

fn decode_asset(value: Option<&Value>, diagnostics: &mut Diagnostics) -> Asset {
    let Some(value) = value else {
        diagnostics.push(Diagnostic::schema_violation(
            EntityRef::Asset,
            "asset",
            "required field missing",
        ));
        return Asset::default();
    };

    let mut f = Fields::new(value, EntityRef::Asset);
    let version = f.required_string("version");
    let generator = f.optional_string("generator");
    let copyright = f.optional_string("copyright");
    let min_version = f.optional_string("minVersion");
    if let Some(v) = &version {
        if !v.starts_with("2.") {
            f.violation("version", format!("unsupported glTF version '{}'", v));
        }
    }

    Asset {
        version,
        generator,
        copyright,
        min_version,
        complete: f.finish(diagnostics),
    }
}

fn decode_buffer(
    index: usize,
    value: &Value,
    embedded_binary: Option<&[u8]>,
    diagnostics: &mut Diagnostics,
) -> Buffer {
    trace!("Decoding buffer {}", index);
    let source = EntityRef::Buffer(index);
    let mut f = Fields::new(value, source);
    let name = f.optional_string("name");
    let byte_length = f.required_uint("byteLength");
    let uri = f.optional_string("uri");

    let data = match (&uri, embedded_binary) {
        (Some(uri), _) => {
            f.note(Diagnostic::unsupported_buffer_source(source, uri.clone()));
            None
        }
        (None, Some(bin)) if index == 0 => {
            if let Some(declared) = byte_length {
                if bin.len() < declared {
                    f.violation(
                        "byteLength",
                        format!(
                            "declares {} bytes but the BIN chunk holds {}",
                            declared,
                            bin.len()
                        ),
                    );
                }
            }
            Some(bin.to_vec())
        }
        (None, None) if index == 0 => {
            f.violation("uri", "buffer 0 has no uri and the container has no BIN chunk");
            None
        }
        (None, _) => {
            f.violation(
                "uri",
                format!("buffer {} has no uri; only buffer 0 may use the BIN chunk", index),
            );
            None
        }
    };

    Buffer {
        name,
        byte_length,
        uri,
        data,
        complete: f.finish(diagnostics),
    }
}

fn decode_buffer_view(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> BufferView {
    trace!("Decoding bufferView {}", index);
    let mut f = Fields::new(value, EntityRef::BufferView(index));
    let name = f.optional_string("name");
    let buffer = f.required_uint("buffer");
    let byte_offset = f.optional_uint("byteOffset").unwrap_or(0);
    let byte_length = f.required_uint("byteLength");
    let byte_stride = f.optional_uint("byteStride");
    let target = f.optional_code("target", "target", |t| t == 34962 || t == 34963);

    BufferView {
        name,
        buffer,
        byte_offset,
        byte_length,
        byte_stride,
        target,
        complete: f.finish(diagnostics),
    }
}

fn decode_accessor(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Accessor {
    trace!("Decoding accessor {}", index);
    let mut f = Fields::new(value, EntityRef::Accessor(index));
    let name = f.optional_string("name");
    let buffer_view = f.optional_uint("bufferView");
    let byte_offset = f.optional_uint("byteOffset").unwrap_or(0);
    let normalized = f.optional_bool("normalized").unwrap_or(false);

    let component_type = f.required_uint("componentType").and_then(|code| {
        let ct = ComponentType::from_code(code as u64);
        if ct.is_none() {
            f.violation("componentType", format!("unknown componentType {}", code));
        }
        ct
    });

    let accessor_type = f.required_string("type").and_then(|name| {
        let ty = AccessorType::parse(&name);
        if ty.is_none() {
            f.violation("type", format!("unknown accessor type '{}'", name));
        }
        ty
    });

    let count = f.required_uint("count");
    if count == Some(0) {
        f.violation("count", "count must be at least 1");
    }

    let min = f.optional_numbers("min");
    let max = f.optional_numbers("max");
    if let Some(ty) = accessor_type {
        for (key, bounds) in [("min", &min), ("max", &max)] {
            if let Some(values) = bounds {
                if values.len() != ty.num_components() {
                    f.violation(
                        key,
                        format!(
                            "has {} values but {} has {} components",
                            values.len(),
                            ty,
                            ty.num_components()
                        ),
                    );
                }
            }
        }
    }

    Accessor {
        name,
        buffer_view,
        byte_offset,
        component_type,
        normalized,
        accessor_type,
        count,
        min,
        max,
        complete: f.finish(diagnostics),
    }
}

fn decode_material(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Material {
    let mut f = Fields::new(value, EntityRef::Material(index));
    let name = f.optional_string("name");
    Material {
        name,
        complete: f.finish(diagnostics),
    }
}

fn decode_mesh(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Mesh {
    trace!("Decoding mesh {}", index);
    let mut f = Fields::new(value, EntityRef::Mesh(index));
    let name = f.optional_string("name");
    let items = f.array("primitives", true).unwrap_or(&[]);
    let complete = f.finish(diagnostics);

    let primitives = items
        .iter()
        .enumerate()
        .map(|(p, v)| decode_primitive(index, p, v, diagnostics))
        .collect();

    Mesh {
        name,
        primitives,
        complete,
    }
}

fn decode_primitive(mesh: usize, index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Primitive {
    let mut f = Fields::new(value, EntityRef::Primitive { mesh, primitive: index });

    let mut attributes = BTreeMap::new();
    if let Some(Value::Object(map)) = f.object("attributes", true) {
        for (semantic, item) in map {
            match as_uint(item) {
                Some(accessor) => {
                    attributes.insert(semantic.clone(), accessor);
                }
                None => f.violation(
                    &format!("attributes.{}", semantic),
                    format!("expected an accessor index, found {}", describe(item)),
                ),
            }
        }
    }

    let indices = f.optional_uint("indices");
    let material = f.optional_uint("material");
    let mode = f.optional_code("mode", "primitive mode", |m| m <= 6);

    Primitive {
        attributes,
        indices,
        material,
        mode,
        complete: f.finish(diagnostics),
    }
}

fn decode_node(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Node {
    trace!("Decoding node {}", index);
    let mut f = Fields::new(value, EntityRef::Node(index));
    let name = f.optional_string("name");
    let mut children = f.uint_list("children");
    let mut seen = HashSet::with_capacity(children.len());
    let mut duplicates = Vec::new();
    children.retain(|&child| {
        if seen.insert(child) {
            true
        } else {
            duplicates.push(child);
            false
        }
    });
    for child in duplicates {
        f.violation("children", format!("child {} is listed more than once", child));
    }
    let mesh = f.optional_uint("mesh");
    Node {
        name,
        children,
        mesh,
        complete: f.finish(diagnostics),
    }
}

fn decode_animation(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Animation {
    trace!("Decoding animation {}", index);
    let mut f = Fields::new(value, EntityRef::Animation(index));
    let name = f.optional_string("name");
    let channel_items = f.array("channels", true).unwrap_or(&[]);
    let sampler_items = f.array("samplers", true).unwrap_or(&[]);
    let complete = f.finish(diagnostics);

    let channels = channel_items
        .iter()
        .enumerate()
        .map(|(c, v)| decode_channel(index, c, v, diagnostics))
        .collect();
    let samplers = sampler_items
        .iter()
        .enumerate()
        .map(|(s, v)| decode_sampler(index, s, v, diagnostics))
        .collect();

    Animation {
        name,
        channels,
        samplers,
        complete,
    }
}

fn decode_channel(
    animation: usize,
    index: usize,
    value: &Value,
    diagnostics: &mut Diagnostics,
) -> AnimationChannel {
    let source = EntityRef::AnimationChannel {
        animation,
        channel: index,
    };
    let mut f = Fields::new(value, source);
    let sampler = f.required_uint("sampler");

    let mut target_node = None;
    let mut target_path = None;
    if let Some(target) = f.object("target", true) {
        let mut t = Fields::with_prefix(target, source, "target.");
        target_node = t.optional_uint("node");
        target_path = t.required_string("path");
        if let Some(path) = &target_path {
            if !ANIMATION_PATHS.contains(&path.as_str()) {
                t.violation("path", format!("unknown target path '{}'", path));
            }
        }
        f.absorb(t);
    }

    AnimationChannel {
        sampler,
        target_node,
        target_path,
        complete: f.finish(diagnostics),
    }
}

fn decode_sampler(
    animation: usize,
    index: usize,
    value: &Value,
    diagnostics: &mut Diagnostics,
) -> AnimationSampler {
    let mut f = Fields::new(
        value,
        EntityRef::AnimationSampler {
            animation,
            sampler: index,
        },
    );
    let input = f.required_uint("input");
    let output = f.required_uint("output");
    let interpolation = match f.optional_string("interpolation") {
        None => Some(Interpolation::Linear),
        Some(name) => {
            let parsed = Interpolation::parse(&name);
            if parsed.is_none() {
                f.violation("interpolation", format!("unknown interpolation '{}'", name));
            }
            parsed
        }
    };

    AnimationSampler {
        input,
        output,
        interpolation,
        complete: f.finish(diagnostics),
    }
}

fn decode_scene(index: usize, value: &Value, diagnostics: &mut Diagnostics) -> Scene {
    let mut f = Fields::new(value, EntityRef::Scene(index));
    let name = f.optional_string("name");
    let nodes = f.uint_list("nodes");
    Scene {
        name,
        nodes,
        complete: f.finish(diagnostics),
    }
}

// ============================================================================
// Tests
// ============================================================================
