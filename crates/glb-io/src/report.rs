//! Deterministic text report for a resolved GLB document.
//!
//! Sections appear in a fixed order and list entities by ascending index.
//! Empty sections are left out entirely. Each diagnostic is printed twice:
//! inline under the entity it concerns, and in the closing `DIAGNOSTICS`
//! summary in the order it was produced.

use glb_core::{Diagnostics, EntityRef};

use crate::model::{Accessor, Buffer, Model};
use crate::resolver::{Link, ResolvedModel};

/// Caller-supplied facts about the report's source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMetadata {
    /// File name shown in the header.
    pub source_name: String,
    pub source_path: Option<String>,
    /// Generation timestamp, already formatted by the caller.
    pub generated_at: String,
}

impl ReportMetadata {
    pub fn new(source_name: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source_path: None,
            generated_at: generated_at.into(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

/// Report formatting options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// Width of the `=` rule under the header.
    pub separator_width: usize,
    /// Fixed decimals for min/max values; `None` prints the shortest form.
    pub float_precision: Option<usize>,
    /// Print the scenes, buffer views and buffers sections.
    pub storage_sections: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            separator_width: 60,
            float_precision: None,
            storage_sections: true,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator_width(mut self, width: usize) -> Self {
        self.separator_width = width;
        self
    }

    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = Some(precision);
        self
    }

    pub fn with_storage_sections(mut self, enabled: bool) -> Self {
        self.storage_sections = enabled;
        self
    }
}

/// Render the report with default options.
pub fn render(resolved: &ResolvedModel<'_>, diagnostics: &Diagnostics, metadata: &ReportMetadata) -> String {
    render_with_options(resolved, diagnostics, metadata, &ReportOptions::default())
}

/// Render the report.
///
/// The output depends only on the arguments; identical inputs produce
/// byte-identical text.
pub fn render_with_options(
    resolved: &ResolvedModel<'_>,
    diagnostics: &Diagnostics,
    metadata: &ReportMetadata,
    options: &ReportOptions,
) -> String {
    let mut report = ReportWriter {
        resolved,
        model: resolved.model(),
        diagnostics,
        options,
        lines: Vec::new(),
    };

    report.header(metadata);
    report.nodes();
    report.meshes();
    report.materials();
    report.animations();
    report.accessors();
    if options.storage_sections {
        report.scenes();
        report.buffer_views();
        report.buffers();
    }
    report.summary();

    let mut text = report.lines.join("\n");
    text.push('\n');
    text
}

const MISSING: &str = "<missing>";

struct ReportWriter<'r, 'a> {
    resolved: &'r ResolvedModel<'a>,
    model: &'a Model,
    diagnostics: &'r Diagnostics,
    options: &'r ReportOptions,
    lines: Vec<String>,
}

impl<'r, 'a> ReportWriter<'r, 'a> {
    fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", " ".repeat(indent), text.as_ref()));
    }

    fn section(&mut self, title: &str, count: usize) {
        self.lines.push(String::new());
        self.lines.push(format!("{} ({}):", title, count));
    }

    fn inline(&mut self, indent: usize, source: EntityRef) {
        let rendered: Vec<String> = self
            .diagnostics
            .for_entity(source)
            .map(|d| format!("! {} [{}]: {}", d.kind.name(), d.field, d.detail))
            .collect();
        for text in rendered {
            self.line(indent, text);
        }
    }

    fn numbers(&self, values: &[f64]) -> String {
        let parts: Vec<String> = values
            .iter()
            .map(|v| match self.options.float_precision {
                Some(p) => format!("{:.*}", p, v),
                None => v.to_string(),
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }

    fn accessor_shape(accessor: &Accessor) -> String {
        format!(
            "type: {}, componentType: {}, count: {}",
            accessor
                .accessor_type
                .map_or(MISSING.to_string(), |t| t.to_string()),
            accessor
                .component_type
                .map_or(MISSING.to_string(), |c| c.to_string()),
            accessor.count.map_or(MISSING.to_string(), |c| c.to_string()),
        )
    }

    fn accessor_bounds(&mut self, indent: usize, accessor: &Accessor) {
        if let Some(min) = &accessor.min {
            let text = format!("min: {}", self.numbers(min));
            self.line(indent, text);
        }
        if let Some(max) = &accessor.max {
            let text = format!("max: {}", self.numbers(max));
            self.line(indent, text);
        }
    }

    fn dangling(link: Link, what: &str) -> String {
        format!("[ERROR: {} {} does not exist]", what, link.index())
    }

    fn incomplete(complete: bool) -> &'static str {
        if complete {
            ""
        } else {
            " [incomplete]"
        }
    }

    fn header(&mut self, metadata: &ReportMetadata) {
        let model = self.model;
        self.line(0, format!("File: {}", metadata.source_name));
        if let Some(path) = &metadata.source_path {
            self.line(0, format!("Path: {}", path));
        }
        self.line(0, format!("Date: {}", metadata.generated_at));
        self.line(0, "=".repeat(self.options.separator_width));

        let asset = &model.asset;
        self.line(
            0,
            format!(
                "Version: {}{}",
                asset.version.as_deref().unwrap_or(MISSING),
                Self::incomplete(asset.complete)
            ),
        );
        if let Some(generator) = &asset.generator {
            self.line(0, format!("Generator: {}", generator));
        }
        if let Some(copyright) = &asset.copyright {
            self.line(0, format!("Copyright: {}", copyright));
        }
        if let Some(min_version) = &asset.min_version {
            self.line(0, format!("Min version: {}", min_version));
        }
        self.inline(2, EntityRef::Container);
        self.inline(2, EntityRef::Root);
        self.inline(2, EntityRef::Asset);
    }

    fn nodes(&mut self) {
        let model = self.model;
        let resolved = self.resolved;
        if model.nodes.is_empty() {
            return;
        }
        self.section("NODES", model.nodes.len());

        for (i, (node, links)) in model.nodes.iter().zip(&resolved.nodes).enumerate() {
            let name = node.name.clone().unwrap_or_else(|| format!("Node {}", i));
            let children: Vec<String> = links
                .children
                .iter()
                .map(|&link| match link {
                    Link::Resolved(c) if links.cyclic_children.contains(&c) => {
                        format!("{} (cycle)", c)
                    }
                    Link::Resolved(c) => c.to_string(),
                    Link::Dangling(c) => format!("{} (missing)", c),
                })
                .collect();
            self.line(
                2,
                format!(
                    "> {} (index {}) -> children: [{}]{}",
                    name,
                    i,
                    children.join(", "),
                    Self::incomplete(node.complete)
                ),
            );

            match links.mesh {
                Some(Link::Resolved(m)) => {
                    let mesh_name = model.meshes[m].name.as_deref().unwrap_or("[unnamed]");
                    self.line(4, format!("mesh: {} ({})", m, mesh_name));
                }
                Some(link) => self.line(4, format!("mesh: {}", Self::dangling(link, "mesh"))),
                None => {}
            }
            self.inline(4, EntityRef::Node(i));
        }
    }

    fn meshes(&mut self) {
        let model = self.model;
        let resolved = self.resolved;
        if model.meshes.is_empty() {
            return;
        }
        self.section("MESHES", model.meshes.len());

        for (i, (mesh, links)) in model.meshes.iter().zip(&resolved.meshes).enumerate() {
            self.line(
                2,
                format!(
                    "> Mesh {}: {}{}",
                    i,
                    mesh.name.as_deref().unwrap_or("[unnamed]"),
                    Self::incomplete(mesh.complete)
                ),
            );
            self.inline(4, EntityRef::Mesh(i));

            for (p, (prim, plinks)) in mesh.primitives.iter().zip(&links.primitives).enumerate() {
                self.line(4, format!("- Primitive {}:{}", p, Self::incomplete(prim.complete)));

                for (semantic, link) in &plinks.attributes {
                    match resolved.accessor(*link) {
                        Some(accessor) => {
                            self.line(8, format!("* Attribute: {} (accessor {})", semantic, link.index()));
                            self.line(10, Self::accessor_shape(accessor));
                            self.accessor_bounds(10, accessor);
                        }
                        None => self.line(
                            8,
                            format!("* Attribute: {} {}", semantic, Self::dangling(*link, "accessor")),
                        ),
                    }
                }

                if let Some(link) = plinks.indices {
                    match resolved.accessor(link) {
                        Some(accessor) => {
                            self.line(8, format!("* Indices: accessor {}", link.index()));
                            self.line(10, Self::accessor_shape(accessor));
                        }
                        None => self.line(8, format!("* Indices: {}", Self::dangling(link, "accessor"))),
                    }
                }

                match plinks.material {
                    Some(Link::Resolved(m)) => {
                        let name = model.materials[m].name.as_deref().unwrap_or("[unnamed]");
                        self.line(8, format!("* Material: {} ({})", m, name));
                    }
                    Some(link) => self.line(8, format!("* Material: {}", Self::dangling(link, "material"))),
                    None => {}
                }

                if let Some(mode) = prim.mode {
                    self.line(8, format!("* Mode: {}", mode));
                }
                self.inline(8, EntityRef::Primitive { mesh: i, primitive: p });
            }
        }
    }

    fn materials(&mut self) {
        let model = self.model;
        if model.materials.is_empty() {
            return;
        }
        self.section("MATERIALS", model.materials.len());

        for (i, material) in model.materials.iter().enumerate() {
            self.line(
                2,
                format!(
                    "> Material {}: {}{}",
                    i,
                    material.name.as_deref().unwrap_or("[unnamed]"),
                    Self::incomplete(material.complete)
                ),
            );
            self.inline(4, EntityRef::Material(i));
        }
    }

    fn animations(&mut self) {
        let model = self.model;
        let resolved = self.resolved;
        if model.animations.is_empty() {
            return;
        }
        self.section("ANIMATIONS", model.animations.len());

        for (i, (animation, links)) in model.animations.iter().zip(&resolved.animations).enumerate() {
            let title = match &animation.name {
                Some(name) => format!("> Animation {}: {}", i, name),
                None => format!("> Animation {}", i),
            };
            self.line(2, format!("{}{}", title, Self::incomplete(animation.complete)));
            self.inline(4, EntityRef::Animation(i));

            for (c, (channel, clinks)) in animation.channels.iter().zip(&links.channels).enumerate() {
                let node = match clinks.target_node {
                    Some(Link::Resolved(n)) => n.to_string(),
                    Some(link) => Self::dangling(link, "node"),
                    None => "none".to_string(),
                };
                let interpolation = match clinks.sampler {
                    Some(Link::Resolved(s)) => animation.samplers[s]
                        .interpolation
                        .map_or(MISSING.to_string(), |i| i.name().to_string()),
                    Some(link) => Self::dangling(link, "sampler"),
                    None => MISSING.to_string(),
                };
                self.line(
                    4,
                    format!(
                        "- Channel {}: node {}, path {}, interpolation {}{}",
                        c,
                        node,
                        channel.target_path.as_deref().unwrap_or(MISSING),
                        interpolation,
                        Self::incomplete(channel.complete)
                    ),
                );
                self.inline(6, EntityRef::AnimationChannel { animation: i, channel: c });
            }

            for (s, (sampler, slinks)) in animation.samplers.iter().zip(&links.samplers).enumerate() {
                let accessor = |link: Option<Link>| match link {
                    Some(Link::Resolved(a)) => a.to_string(),
                    Some(link) => Self::dangling(link, "accessor"),
                    None => MISSING.to_string(),
                };
                self.line(
                    4,
                    format!(
                        "- Sampler {}: input {}, output {}, interpolation {}{}",
                        s,
                        accessor(slinks.input),
                        accessor(slinks.output),
                        sampler
                            .interpolation
                            .map_or(MISSING, |i| i.name()),
                        Self::incomplete(sampler.complete)
                    ),
                );
                self.inline(6, EntityRef::AnimationSampler { animation: i, sampler: s });
            }
        }
    }

    fn accessors(&mut self) {
        let model = self.model;
        let resolved = self.resolved;
        if model.accessors.is_empty() {
            return;
        }
        self.section("ACCESSORS", model.accessors.len());

        for (i, (accessor, links)) in model.accessors.iter().zip(&resolved.accessors).enumerate() {
            let name = accessor
                .name
                .as_deref()
                .map(|n| format!(" \"{}\"", n))
                .unwrap_or_default();
            self.line(
                2,
                format!(
                    "> Accessor {}{}: {}{}",
                    i,
                    name,
                    Self::accessor_shape(accessor),
                    Self::incomplete(accessor.complete)
                ),
            );
            match links.buffer_view {
                Some(Link::Resolved(v)) => self.line(
                    4,
                    format!("bufferView: {}, byteOffset: {}", v, accessor.byte_offset),
                ),
                Some(link) => self.line(4, format!("bufferView: {}", Self::dangling(link, "bufferView"))),
                None => {}
            }
            if accessor.normalized {
                self.line(4, "normalized: true");
            }
            self.accessor_bounds(4, accessor);
            self.inline(4, EntityRef::Accessor(i));
        }
    }

    fn scenes(&mut self) {
        let model = self.model;
        let resolved = self.resolved;
        if model.scenes.is_empty() {
            return;
        }
        self.section("SCENES", model.scenes.len());

        for (i, (scene, links)) in model.scenes.iter().zip(&resolved.scenes).enumerate() {
            let nodes: Vec<String> = links
                .nodes
                .iter()
                .map(|&link| match link {
                    Link::Resolved(n) => n.to_string(),
                    Link::Dangling(n) => format!("{} (missing)", n),
                })
                .collect();
            let default = if resolved.default_scene == Some(Link::Resolved(i)) {
                " (default)"
            } else {
                ""
            };
            self.line(
                2,
                format!(
                    "> Scene {}: {}{} -> nodes: [{}]{}",
                    i,
                    scene.name.as_deref().unwrap_or("[unnamed]"),
                    default,
                    nodes.join(", "),
                    Self::incomplete(scene.complete)
                ),
            );
            self.inline(4, EntityRef::Scene(i));
        }
    }

    fn buffer_views(&mut self) {
        let model = self.model;
        let resolved = self.resolved;
        if model.buffer_views.is_empty() {
            return;
        }
        self.section("BUFFER VIEWS", model.buffer_views.len());

        for (i, (view, links)) in model.buffer_views.iter().zip(&resolved.buffer_views).enumerate() {
            let buffer = match links.buffer {
                Some(Link::Resolved(b)) => b.to_string(),
                Some(link) => Self::dangling(link, "buffer"),
                None => MISSING.to_string(),
            };
            let mut text = format!(
                "> BufferView {}: buffer {}, byteOffset {}, byteLength {}",
                i,
                buffer,
                view.byte_offset,
                view.byte_length.map_or(MISSING.to_string(), |l| l.to_string())
            );
            if let Some(stride) = view.byte_stride {
                text.push_str(&format!(", byteStride {}", stride));
            }
            if let Some(target) = view.target {
                text.push_str(&format!(", target {}", target));
            }
            text.push_str(Self::incomplete(view.complete));
            self.line(2, text);
            self.inline(4, EntityRef::BufferView(i));
        }
    }

    fn buffer_source(buffer: &Buffer) -> String {
        match (&buffer.data, &buffer.uri) {
            (Some(data), _) => format!("embedded BIN chunk ({} bytes)", data.len()),
            (None, Some(uri)) if uri.starts_with("data:") => "data URI (not decoded)".to_string(),
            (None, Some(uri)) => format!("external '{}' (not loaded)", uri),
            (None, None) => "absent".to_string(),
        }
    }

    fn buffers(&mut self) {
        let model = self.model;
        if model.buffers.is_empty() {
            return;
        }
        self.section("BUFFERS", model.buffers.len());

        for (i, buffer) in model.buffers.iter().enumerate() {
            self.line(
                2,
                format!(
                    "> Buffer {}: byteLength {}, source: {}{}",
                    i,
                    buffer.byte_length.map_or(MISSING.to_string(), |l| l.to_string()),
                    Self::buffer_source(buffer),
                    Self::incomplete(buffer.complete)
                ),
            );
            self.inline(4, EntityRef::Buffer(i));
        }
    }

    fn summary(&mut self) {
        let diagnostics = self.diagnostics;
        self.section("DIAGNOSTICS", diagnostics.len());
        if diagnostics.is_empty() {
            self.line(2, "none");
            return;
        }
        for (n, d) in diagnostics.iter().enumerate() {
            self.line(2, format!("{}. {}", n + 1, d));
        }
    }
}
