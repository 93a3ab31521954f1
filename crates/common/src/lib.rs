//! Common types and utilities for protoc-gen-tsd
//!
//! This crate contains the shared error type and the declaration model that
//! flows from the formatter into the renderer.

pub mod model;

pub use model::{
    Declaration, DeclarationModel, EnumConstant, EnumDeclaration, ImportDeclaration,
    InterfaceDeclaration, Member, TsType,
};

use thiserror::Error;

/// Errors that can occur while generating declaration files
#[derive(Error, Debug)]
pub enum TsdError {
    #[error("failed to decode CodeGeneratorRequest: {0}")]
    Decode(prost::DecodeError),

    #[error("failed to encode CodeGeneratorResponse: {0}")]
    Encode(prost::EncodeError),

    #[error("type `{type_name}` is not defined in any file of the request")]
    Resolution { type_name: String },

    #[error("{file}: cannot project `{member}`")]
    Projection {
        file: String,
        member: String,
        #[source]
        source: Box<TsdError>,
    },

    #[error("type `{full_name}` is defined in both {first} and {second}")]
    DuplicateType {
        full_name: String,
        first: String,
        second: String,
    },

    #[error("map entry `{0}` lacks a key or value field")]
    MalformedMapEntry(String),

    #[error("file `{0}` appears more than once in the request")]
    DuplicateFile(String),

    #[error("{file}: more than one type flattens to the declaration name `{name}`")]
    DuplicateDeclaration { file: String, name: String },

    #[error("file to generate `{0}` is missing from the request's descriptors")]
    MissingFile(String),

    #[error("template `{template}`: {message}")]
    Render { template: String, message: String },

    #[error("plugin driver has already processed a request")]
    DriverReused,
}

impl TsdError {
    /// Whether this error, or the error it wraps, is a failed type lookup
    pub fn is_resolution(&self) -> bool {
        match self {
            TsdError::Resolution { .. } => true,
            TsdError::Projection { source, .. } => source.is_resolution(),
            _ => false,
        }
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, TsdError>;
