//! Non-fatal findings produced while decoding and resolving a GLB asset.
//!
//! A [`Diagnostic`] names the entity it concerns ([`EntityRef`]), the field
//! inside that entity, and a human-readable detail. Diagnostics are collected
//! in a [`Diagnostics`] list that only ever grows: nothing is removed or
//! reordered once recorded, so the report can replay them in production
//! order.

use std::fmt;

use log::debug;

/// Identity of the entity a diagnostic is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// The binary container itself (header and chunks).
    Container,
    /// The top-level JSON object.
    Root,
    Asset,
    Buffer(usize),
    BufferView(usize),
    Accessor(usize),
    Material(usize),
    Mesh(usize),
    Primitive { mesh: usize, primitive: usize },
    Node(usize),
    Scene(usize),
    Animation(usize),
    AnimationChannel { animation: usize, channel: usize },
    AnimationSampler { animation: usize, sampler: usize },
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Container => write!(f, "container"),
            EntityRef::Root => write!(f, "document"),
            EntityRef::Asset => write!(f, "asset"),
            EntityRef::Buffer(i) => write!(f, "buffer {}", i),
            EntityRef::BufferView(i) => write!(f, "bufferView {}", i),
            EntityRef::Accessor(i) => write!(f, "accessor {}", i),
            EntityRef::Material(i) => write!(f, "material {}", i),
            EntityRef::Mesh(i) => write!(f, "mesh {}", i),
            EntityRef::Primitive { mesh, primitive } => {
                write!(f, "mesh {} primitive {}", mesh, primitive)
            }
            EntityRef::Node(i) => write!(f, "node {}", i),
            EntityRef::Scene(i) => write!(f, "scene {}", i),
            EntityRef::Animation(i) => write!(f, "animation {}", i),
            EntityRef::AnimationChannel { animation, channel } => {
                write!(f, "animation {} channel {}", animation, channel)
            }
            EntityRef::AnimationSampler { animation, sampler } => {
                write!(f, "animation {} sampler {}", animation, sampler)
            }
        }
    }
}

/// Kind of entity an index field points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Buffer,
    BufferView,
    Accessor,
    Material,
    Mesh,
    Node,
    Scene,
    AnimationSampler,
}

impl EntityKind {
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Buffer => "buffer",
            EntityKind::BufferView => "bufferView",
            EntityKind::Accessor => "accessor",
            EntityKind::Material => "material",
            EntityKind::Mesh => "mesh",
            EntityKind::Node => "node",
            EntityKind::Scene => "scene",
            EntityKind::AnimationSampler => "sampler",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What went wrong, with the data a caller may want to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Required field missing, wrong JSON type, unknown enum value or an
    /// inconsistent size.
    SchemaViolation,
    /// An index field points past the end of its target array.
    DanglingReference {
        target: EntityKind,
        index: usize,
        available: usize,
    },
    /// The node-children relation loops back on itself along `path`.
    GraphCycle { path: Vec<usize> },
    /// A buffer declares a URI instead of using the embedded BIN chunk.
    UnsupportedBufferSource { uri: String },
    /// A chunk after the BIN chunk.
    UnsupportedExtraChunk { chunk_type: u32, length: u32 },
}

impl DiagnosticKind {
    pub const fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::SchemaViolation => "SchemaViolation",
            DiagnosticKind::DanglingReference { .. } => "DanglingReference",
            DiagnosticKind::GraphCycle { .. } => "GraphCycle",
            DiagnosticKind::UnsupportedBufferSource { .. } => "UnsupportedBufferSource",
            DiagnosticKind::UnsupportedExtraChunk { .. } => "UnsupportedExtraChunk",
        }
    }
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub source: EntityRef,
    /// Field inside `source`, e.g. `componentType` or `attributes.POSITION`.
    pub field: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn schema_violation(
        source: EntityRef,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::SchemaViolation,
            source,
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub fn dangling_reference(
        source: EntityRef,
        field: impl Into<String>,
        target: EntityKind,
        index: usize,
        available: usize,
    ) -> Self {
        Self {
            kind: DiagnosticKind::DanglingReference {
                target,
                index,
                available,
            },
            source,
            field: field.into(),
            detail: format!(
                "{} index {} out of range ({} available)",
                target, index, available
            ),
        }
    }

    pub fn graph_cycle(source: EntityRef, path: Vec<usize>) -> Self {
        let detail = format!("node cycle through path {:?}", path);
        Self {
            kind: DiagnosticKind::GraphCycle { path },
            source,
            field: "children".to_string(),
            detail,
        }
    }

    pub fn unsupported_buffer_source(source: EntityRef, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let detail = if uri.starts_with("data:") {
            "data URI buffers are not decoded; content treated as absent".to_string()
        } else {
            format!("external buffer '{}' is not loaded; content treated as absent", uri)
        };
        Self {
            kind: DiagnosticKind::UnsupportedBufferSource { uri },
            source,
            field: "uri".to_string(),
            detail,
        }
    }

    pub fn unsupported_extra_chunk(position: usize, chunk_type: u32, length: u32) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedExtraChunk { chunk_type, length },
            source: EntityRef::Container,
            field: format!("chunks[{}]", position),
            detail: format!(
                "extra chunk of type 0x{:08X} ({} bytes) ignored",
                chunk_type, length
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} [{}]: {}",
            self.kind.name(),
            self.source,
            self.field,
            self.detail
        )
    }
}

/// Append-only, ordered list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        debug!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Appends every entry of `other`, keeping its order.
    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics attached to `source`, in production order.
    pub fn for_entity(&self, source: EntityRef) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter().filter(move |d| d.source == source)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
