//! glTF accessor component and element types.

use std::fmt;

/// Accessor `componentType` values defined by glTF 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    Byte = 5120,
    UnsignedByte = 5121,
    Short = 5122,
    UnsignedShort = 5123,
    UnsignedInt = 5125,
    Float = 5126,
}

impl ComponentType {
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Byte,
        ComponentType::UnsignedByte,
        ComponentType::Short,
        ComponentType::UnsignedShort,
        ComponentType::UnsignedInt,
        ComponentType::Float,
    ];

    /// Maps a raw `componentType` code to its enum value.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            5120 => Some(ComponentType::Byte),
            5121 => Some(ComponentType::UnsignedByte),
            5122 => Some(ComponentType::Short),
            5123 => Some(ComponentType::UnsignedShort),
            5125 => Some(ComponentType::UnsignedInt),
            5126 => Some(ComponentType::Float),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn byte_length(self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ComponentType::Byte => "BYTE",
            ComponentType::UnsignedByte => "UNSIGNED_BYTE",
            ComponentType::Short => "SHORT",
            ComponentType::UnsignedShort => "UNSIGNED_SHORT",
            ComponentType::UnsignedInt => "UNSIGNED_INT",
            ComponentType::Float => "FLOAT",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Accessor `type` values defined by glTF 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    pub const ALL: [AccessorType; 7] = [
        AccessorType::Scalar,
        AccessorType::Vec2,
        AccessorType::Vec3,
        AccessorType::Vec4,
        AccessorType::Mat2,
        AccessorType::Mat3,
        AccessorType::Mat4,
    ];

    /// Parses the glTF spelling (`"SCALAR"`, `"VEC3"`, ...). Case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "SCALAR" => Some(AccessorType::Scalar),
            "VEC2" => Some(AccessorType::Vec2),
            "VEC3" => Some(AccessorType::Vec3),
            "VEC4" => Some(AccessorType::Vec4),
            "MAT2" => Some(AccessorType::Mat2),
            "MAT3" => Some(AccessorType::Mat3),
            "MAT4" => Some(AccessorType::Mat4),
            _ => None,
        }
    }

    /// Number of components in one element.
    pub fn num_components(self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec2 => 2,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 | AccessorType::Mat2 => 4,
            AccessorType::Mat3 => 9,
            AccessorType::Mat4 => 16,
        }
    }

    /// Number of columns for matrix types, `None` for scalars and vectors.
    pub fn matrix_columns(self) -> Option<usize> {
        match self {
            AccessorType::Mat2 => Some(2),
            AccessorType::Mat3 => Some(3),
            AccessorType::Mat4 => Some(4),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AccessorType::Scalar => "SCALAR",
            AccessorType::Vec2 => "VEC2",
            AccessorType::Vec3 => "VEC3",
            AccessorType::Vec4 => "VEC4",
            AccessorType::Mat2 => "MAT2",
            AccessorType::Mat3 => "MAT3",
            AccessorType::Mat4 => "MAT4",
        }
    }
}

impl fmt::Display for AccessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size in bytes of one accessor element.
///
/// Matrix columns start on 4-byte boundaries, so `MAT2`/`MAT3` of 1- and
/// 2-byte components carry per-column padding.
pub fn element_byte_size(component_type: ComponentType, accessor_type: AccessorType) -> usize {
    let component = component_type.byte_length();
    match accessor_type.matrix_columns() {
        Some(columns) => {
            let column = (columns * component).div_ceil(4) * 4;
            column * columns
        }
        None => accessor_type.num_components() * component,
    }
}
