//! Declaration model
//!
//! The renderer-agnostic description of one generated `.d.ts` file. The
//! formatter builds one `DeclarationModel` per requested file and the
//! renderer stamps it into text without reordering anything.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All declarations for one generated file, in output order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeclarationModel {
    /// Source file name (e.g., "shop/v1/order.proto")
    pub file_name: String,
    /// Protobuf package, empty when the file declares none
    pub package: String,
    /// Syntax keyword of the source file ("proto2", "proto3", "editions")
    pub syntax: String,
    /// One import per external file referenced, in first-reference order
    pub imports: Vec<ImportDeclaration>,
    /// Top-level declarations, nested types already flattened
    pub declarations: Vec<Declaration>,
}

/// A namespace import of another generated declaration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportDeclaration {
    /// Namespace identifier used to qualify references (e.g., "common_pb")
    pub alias: String,
    /// Module specifier relative to the importing file (e.g., "../common")
    pub path: String,
    /// Source file that owns the referenced types
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Interface(InterfaceDeclaration),
    Enum(EnumDeclaration),
}

impl Declaration {
    /// Flattened declaration name
    pub fn name(&self) -> &str {
        match self {
            Declaration::Interface(interface) => &interface.name,
            Declaration::Enum(enumeration) => &enumeration.name,
        }
    }
}

/// Interface projected from a message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterfaceDeclaration {
    pub name: String,
    /// Fully-qualified protobuf name, without the leading dot
    pub full_name: String,
    /// JSDoc lines, empty when there is nothing to document
    pub doc: Vec<String>,
    /// One member per field, in declared field order
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub name: String,
    pub ts_type: TsType,
    pub doc: Vec<String>,
    /// Name of the oneof group this member belongs to
    pub oneof: Option<String>,
}

/// Enum projected from a protobuf enum
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnumDeclaration {
    pub name: String,
    pub full_name: String,
    pub doc: Vec<String>,
    /// Constants in declaration order; values may repeat
    pub constants: Vec<EnumConstant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnumConstant {
    pub name: String,
    pub value: i32,
    pub doc: Vec<String>,
}

/// TypeScript type of an interface member
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TsType {
    Number,
    String,
    Boolean,
    Bytes,
    /// Declared type, qualified with an import alias when it lives in another file
    Reference { name: String },
    Array { element: Box<TsType> },
    Map { key: Box<TsType>, value: Box<TsType> },
}

impl TsType {
    pub fn array(element: TsType) -> Self {
        TsType::Array {
            element: Box::new(element),
        }
    }

    pub fn map(key: TsType, value: TsType) -> Self {
        TsType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TsType::Reference { name: name.into() }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::Number => f.write_str("number"),
            TsType::String => f.write_str("string"),
            TsType::Boolean => f.write_str("boolean"),
            TsType::Bytes => f.write_str("Uint8Array"),
            TsType::Reference { name } => f.write_str(name),
            TsType::Array { element } => write!(f, "{}[]", element),
            TsType::Map { key, value } => {
                // Index signatures only accept string or number keys
                let key = match key.as_ref() {
                    TsType::Number => "number",
                    _ => "string",
                };
                write!(f, "{{ [key: {}]: {} }}", key, value)
            }
        }
    }
}
