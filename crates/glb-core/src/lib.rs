//! GLB Inspector Core Library
//!
//! Building blocks shared by the GLB container reader and the scene-graph
//! inspector: a bounds-checked little-endian byte reader, the fatal error
//! type, the append-only diagnostics list, and the glTF component/element
//! type tables.

pub mod byte_reader;
pub mod component;
pub mod diagnostics;
pub mod error;

pub use byte_reader::ByteReader;
pub use component::{element_byte_size, AccessorType, ComponentType};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, EntityKind, EntityRef};
pub use error::{GlbError, Result};
