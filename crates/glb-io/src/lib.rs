//! GLB inspection library.
//!
//! Decodes a binary glTF (GLB) container, builds a typed scene-graph model
//! from its JSON chunk, resolves every index reference and renders a
//! deterministic text report.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Container | [`container`] | header, JSON text, BIN payload |
//! | Model | [`model`] | typed entities, schema diagnostics |
//! | Resolver | [`resolver`] | resolved links, reference/cycle diagnostics |
//! | Report | [`report`] | text |
//!
//! Only a structurally broken container is fatal. Everything else is a
//! [`Diagnostic`](glb_core::Diagnostic) shown in the report.
//!
//! ```ignore
//! use glb_io::{GlbDocument, ReportMetadata, ReportOptions};
//!
//! let doc = GlbDocument::open("model.glb")?;
//! let metadata = ReportMetadata::new("model.glb", "16/10/2026 12:00:00");
//! println!("{}", doc.render_report(&metadata, &ReportOptions::default()));
//! ```

pub mod container;
pub mod model;
pub mod report;
pub mod resolver;

use std::fs;
use std::path::Path;

use glb_core::{Diagnostics, Result};
use log::debug;

pub use container::{decode_container, Chunk, Container};
pub use model::{build_model, Model};
pub use report::{render, render_with_options, ReportMetadata, ReportOptions};
pub use resolver::{resolve, Link, ResolvedModel};

/// A decoded GLB asset: the model plus the diagnostics found while decoding
/// the container and the JSON chunk.
#[derive(Debug, Clone)]
pub struct GlbDocument {
    model: Model,
    diagnostics: Diagnostics,
}

impl GlbDocument {
    /// Read and decode a GLB file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_glb(&data)
    }

    /// Decode GLB bytes.
    ///
    /// Container diagnostics come first, followed by model diagnostics.
    pub fn from_glb(data: &[u8]) -> Result<Self> {
        let container = decode_container(data)?;
        let (model, model_diagnostics) = build_model(container.json, container.bin)?;

        let mut diagnostics = container.diagnostics;
        diagnostics.append(model_diagnostics);
        debug!(
            "Decoded GLB: {} nodes, {} meshes, {} accessors, {} diagnostics",
            model.nodes.len(),
            model.meshes.len(),
            model.accessors.len(),
            diagnostics.len()
        );
        Ok(Self { model, diagnostics })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Diagnostics from decoding only; resolution adds more.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Resolve every cross reference in the model.
    pub fn resolve(&self) -> Inspection<'_> {
        let (resolved, resolve_diagnostics) = resolve(&self.model);
        let mut diagnostics = self.diagnostics.clone();
        diagnostics.append(resolve_diagnostics);
        Inspection {
            resolved,
            diagnostics,
        }
    }

    pub fn render_report(&self, metadata: &ReportMetadata, options: &ReportOptions) -> String {
        self.resolve().render(metadata, options)
    }
}

/// A resolved document with every diagnostic in production order.
#[derive(Debug)]
pub struct Inspection<'a> {
    pub resolved: ResolvedModel<'a>,
    pub diagnostics: Diagnostics,
}

impl Inspection<'_> {
    pub fn render(&self, metadata: &ReportMetadata, options: &ReportOptions) -> String {
        render_with_options(&self.resolved, &self.diagnostics, metadata, options)
    }
}

/// Decode, resolve and render `data` with default report options.
pub fn inspect_glb(data: &[u8], metadata: &ReportMetadata) -> Result<String> {
    let document = GlbDocument::from_glb(data)?;
    Ok(document.render_report(metadata, &ReportOptions::default()))
}
