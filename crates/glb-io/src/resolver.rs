//! Cross-reference resolution and graph validation.
//!
//! [`resolve`] walks every index field of a [`Model`] and produces a
//! [`ResolvedModel`]: a read-only view that pairs each entity with its
//! checked links. An index that is out of range becomes a
//! [`Link::Dangling`] plus a `DanglingReference` diagnostic and is never
//! followed. Node cycles are found with an iterative depth-first walk and
//! reported as `GraphCycle`.
//!
//! The resolver also performs the byte-range checks that need two entities at
//! once (accessor against bufferView, bufferView against buffer).

use glb_core::{
    element_byte_size, AccessorType, ComponentType, Diagnostic, Diagnostics, EntityKind, EntityRef,
};
use log::debug;

use crate::model::{Accessor, BufferView, Model};

/// A checked index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    Resolved(usize),
    /// Out of range; the raw index is kept for reporting.
    Dangling(usize),
}

impl Link {
    pub fn index(self) -> usize {
        match self {
            Link::Resolved(i) | Link::Dangling(i) => i,
        }
    }

    pub fn resolved(self) -> Option<usize> {
        match self {
            Link::Resolved(i) => Some(i),
            Link::Dangling(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedBufferView {
    pub buffer: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAccessor {
    pub buffer_view: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPrimitive {
    /// Attribute links in semantic-name order.
    pub attributes: Vec<(String, Link)>,
    pub indices: Option<Link>,
    pub material: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMesh {
    pub primitives: Vec<ResolvedPrimitive>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedNode {
    pub children: Vec<Link>,
    pub mesh: Option<Link>,
    /// Children whose edge closes a cycle; the walk does not follow them.
    pub cyclic_children: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSampler {
    pub input: Option<Link>,
    pub output: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedChannel {
    pub sampler: Option<Link>,
    pub target_node: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAnimation {
    pub channels: Vec<ResolvedChannel>,
    pub samplers: Vec<ResolvedSampler>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedScene {
    pub nodes: Vec<Link>,
}

/// Annotated, read-only view over a [`Model`].
///
/// The per-entity vectors run parallel to the model's collections:
/// `nodes[i]` annotates `model().nodes[i]`, and so on.
#[derive(Debug, Clone)]
pub struct ResolvedModel<'a> {
    model: &'a Model,
    pub buffer_views: Vec<ResolvedBufferView>,
    pub accessors: Vec<ResolvedAccessor>,
    pub meshes: Vec<ResolvedMesh>,
    pub nodes: Vec<ResolvedNode>,
    pub animations: Vec<ResolvedAnimation>,
    pub scenes: Vec<ResolvedScene>,
    pub default_scene: Option<Link>,
}

impl<'a> ResolvedModel<'a> {
    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// The accessor behind `link`, if it resolved.
    pub fn accessor(&self, link: Link) -> Option<&'a Accessor> {
        link.resolved().and_then(|i| self.model.accessors.get(i))
    }
}

/// Resolve every index field of `model`.
///
/// Returns the annotated view and the diagnostics produced by resolution, in
/// the order they were found. The model itself is not modified.
pub fn resolve(model: &Model) -> (ResolvedModel<'_>, Diagnostics) {
    let mut resolver = Resolver {
        model,
        diagnostics: Diagnostics::new(),
    };

    let buffer_views = model
        .buffer_views
        .iter()
        .enumerate()
        .map(|(i, view)| resolver.buffer_view(i, view))
        .collect();
    let accessors = model
        .accessors
        .iter()
        .enumerate()
        .map(|(i, accessor)| resolver.accessor(i, accessor))
        .collect();
    let meshes = (0..model.meshes.len()).map(|i| resolver.mesh(i)).collect();
    let mut nodes: Vec<ResolvedNode> = (0..model.nodes.len()).map(|i| resolver.node(i)).collect();
    resolver.detect_cycles(&mut nodes);
    let animations = (0..model.animations.len())
        .map(|i| resolver.animation(i))
        .collect();
    let scenes = model
        .scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| ResolvedScene {
            nodes: scene
                .nodes
                .iter()
                .enumerate()
                .map(|(n, &node)| {
                    resolver.link(
                        EntityRef::Scene(i),
                        format!("nodes[{}]", n),
                        EntityKind::Node,
                        node,
                    )
                })
                .collect(),
        })
        .collect();
    let default_scene = model
        .scene
        .map(|s| resolver.link(EntityRef::Root, "scene".to_string(), EntityKind::Scene, s));

    debug!(
        "Resolved model: {} diagnostics",
        resolver.diagnostics.len()
    );

    (
        ResolvedModel {
            model,
            buffer_views,
            accessors,
            meshes,
            nodes,
            animations,
            scenes,
            default_scene,
        },
        resolver.diagnostics,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

struct Resolver<'a> {
    model: &'a Model,
    diagnostics: Diagnostics,
}

impl<'a> Resolver<'a> {
    fn target_len(&self, target: EntityKind, source: EntityRef) -> usize {
        match target {
            EntityKind::Buffer => self.model.buffers.len(),
            EntityKind::BufferView => self.model.buffer_views.len(),
            EntityKind::Accessor => self.model.accessors.len(),
            EntityKind::Material => self.model.materials.len(),
            EntityKind::Mesh => self.model.meshes.len(),
            EntityKind::Node => self.model.nodes.len(),
            EntityKind::Scene => self.model.scenes.len(),
            EntityKind::AnimationSampler => match source {
                EntityRef::AnimationChannel { animation, .. } => {
                    self.model.animations[animation].samplers.len()
                }
                _ => 0,
            },
        }
    }

    fn link(&mut self, source: EntityRef, field: String, target: EntityKind, index: usize) -> Link {
        let available = self.target_len(target, source);
        if index < available {
            Link::Resolved(index)
        } else {
            self.diagnostics.push(Diagnostic::dangling_reference(
                source, field, target, index, available,
            ));
            Link::Dangling(index)
        }
    }

    fn optional_link(
        &mut self,
        source: EntityRef,
        field: &str,
        target: EntityKind,
        index: Option<usize>,
    ) -> Option<Link> {
        index.map(|i| self.link(source, field.to_string(), target, i))
    }

    fn violation(&mut self, source: EntityRef, field: &str, detail: String) {
        self.diagnostics
            .push(Diagnostic::schema_violation(source, field, detail));
    }

    fn buffer_view(&mut self, index: usize, view: &BufferView) -> ResolvedBufferView {
        let source = EntityRef::BufferView(index);
        let buffer = self.optional_link(source, "buffer", EntityKind::Buffer, view.buffer);

        if let Some(stride) = view.byte_stride {
            if !(4..=252).contains(&stride) || stride % 4 != 0 {
                self.violation(
                    source,
                    "byteStride",
                    format!("byteStride {} must be a multiple of 4 in 4..=252", stride),
                );
            }
        }

        // Only embedded content can be range-checked.
        let model = self.model;
        if let (Some(b), Some(length)) = (buffer.and_then(Link::resolved), view.byte_length) {
            if let Some(data) = &model.buffers[b].data {
                let end = view.byte_offset.saturating_add(length);
                if end > data.len() {
                    self.violation(
                        source,
                        "byteLength",
                        format!(
                            "range {}..{} exceeds buffer {} ({} bytes)",
                            view.byte_offset,
                            end,
                            b,
                            data.len()
                        ),
                    );
                }
            }
        }

        ResolvedBufferView { buffer }
    }

    fn accessor(&mut self, index: usize, accessor: &Accessor) -> ResolvedAccessor {
        let source = EntityRef::Accessor(index);
        let buffer_view =
            self.optional_link(source, "bufferView", EntityKind::BufferView, accessor.buffer_view);

        if let (Some(v), Some(ct), Some(ty), Some(count)) = (
            buffer_view.and_then(Link::resolved),
            accessor.component_type,
            accessor.accessor_type,
            accessor.count,
        ) {
            self.check_accessor_range(source, accessor, v, ct, ty, count);
        }

        ResolvedAccessor { buffer_view }
    }

    fn check_accessor_range(
        &mut self,
        source: EntityRef,
        accessor: &Accessor,
        view_index: usize,
        component_type: ComponentType,
        accessor_type: AccessorType,
        count: usize,
    ) {
        let model = self.model;
        let view = &model.buffer_views[view_index];
        let element = element_byte_size(component_type, accessor_type);
        let stride = match view.byte_stride {
            Some(s) if s >= element => s,
            Some(s) => {
                self.violation(
                    source,
                    "bufferView",
                    format!(
                        "bufferView {} byteStride {} is smaller than the {}-byte element",
                        view_index, s, element
                    ),
                );
                return;
            }
            None => element,
        };
        let Some(view_length) = view.byte_length else {
            return;
        };

        let available = view_length.saturating_sub(accessor.byte_offset);
        let capacity = if available < element {
            0
        } else {
            (available - element) / stride + 1
        };
        if count > capacity {
            self.violation(
                source,
                "count",
                format!(
                    "declared count {} but bufferView {} ({} bytes, byteOffset {}, stride {}) holds {} elements",
                    count, view_index, view_length, accessor.byte_offset, stride, capacity
                ),
            );
        }
    }

    fn mesh(&mut self, index: usize) -> ResolvedMesh {
        let model = self.model;
        let primitives = model.meshes[index]
            .primitives
            .iter()
            .enumerate()
            .map(|(p, prim)| {
                let source = EntityRef::Primitive {
                    mesh: index,
                    primitive: p,
                };
                let attributes = prim
                    .attributes
                    .iter()
                    .map(|(semantic, &accessor)| {
                        let link = self.link(
                            source,
                            format!("attributes.{}", semantic),
                            EntityKind::Accessor,
                            accessor,
                        );
                        (semantic.clone(), link)
                    })
                    .collect();
                ResolvedPrimitive {
                    attributes,
                    indices: self.optional_link(source, "indices", EntityKind::Accessor, prim.indices),
                    material: self.optional_link(source, "material", EntityKind::Material, prim.material),
                }
            })
            .collect();
        ResolvedMesh { primitives }
    }

    fn node(&mut self, index: usize) -> ResolvedNode {
        let model = self.model;
        let node = &model.nodes[index];
        let source = EntityRef::Node(index);
        let children = node
            .children
            .iter()
            .enumerate()
            .map(|(c, &child)| self.link(source, format!("children[{}]", c), EntityKind::Node, child))
            .collect();
        ResolvedNode {
            children,
            mesh: self.optional_link(source, "mesh", EntityKind::Mesh, node.mesh),
            cyclic_children: Vec::new(),
        }
    }

    /// Depth-first walk over resolved child links from every unvisited node.
    ///
    /// Each node is entered once and each edge examined once. An edge back to
    /// a node still on the current path is a cycle: it is reported and not
    /// followed.
    fn detect_cycles(&mut self, nodes: &mut [ResolvedNode]) {
        let mut marks = vec![Mark::Unvisited; nodes.len()];
        // (node, position of the next child to examine)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for start in 0..nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::OnPath;
            stack.push((start, 0));

            while let Some(&(node, next)) = stack.last() {
                let Some(link) = nodes[node].children.get(next).copied() else {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let Link::Resolved(child) = link else {
                    continue;
                };

                match marks[child] {
                    Mark::Unvisited => {
                        marks[child] = Mark::OnPath;
                        stack.push((child, 0));
                    }
                    Mark::OnPath if nodes[node].cyclic_children.contains(&child) => {}
                    Mark::OnPath => {
                        let from = stack.iter().position(|&(n, _)| n == child).unwrap_or(0);
                        let path: Vec<usize> = stack[from..].iter().map(|&(n, _)| n).collect();
                        self.diagnostics
                            .push(Diagnostic::graph_cycle(EntityRef::Node(node), path));
                        nodes[node].cyclic_children.push(child);
                    }
                    Mark::Done => {}
                }
            }
        }
    }

    fn animation(&mut self, index: usize) -> ResolvedAnimation {
        let model = self.model;
        let animation = &model.animations[index];

        let samplers = animation
            .samplers
            .iter()
            .enumerate()
            .map(|(s, sampler)| {
                let source = EntityRef::AnimationSampler {
                    animation: index,
                    sampler: s,
                };
                let input = self.optional_link(source, "input", EntityKind::Accessor, sampler.input);
                let output = self.optional_link(source, "output", EntityKind::Accessor, sampler.output);
                if let Some(i) = input.and_then(Link::resolved) {
                    let acc = &model.accessors[i];
                    let scalar_float = acc.accessor_type.map_or(true, |t| t == AccessorType::Scalar)
                        && acc.component_type.map_or(true, |c| c == ComponentType::Float);
                    if !scalar_float {
                        self.violation(
                            source,
                            "input",
                            format!("input accessor {} must be SCALAR FLOAT", i),
                        );
                    }
                }
                ResolvedSampler { input, output }
            })
            .collect();

        let channels = animation
            .channels
            .iter()
            .enumerate()
            .map(|(c, channel)| {
                let source = EntityRef::AnimationChannel {
                    animation: index,
                    channel: c,
                };
                ResolvedChannel {
                    sampler: self.optional_link(
                        source,
                        "sampler",
                        EntityKind::AnimationSampler,
                        channel.sampler,
                    ),
                    target_node: self.optional_link(
                        source,
                        "target.node",
                        EntityKind::Node,
                        channel.target_node,
                    ),
                }
            })
            .collect();

        ResolvedAnimation { channels, samplers }
    }
}
