//! Cross-file descriptor registry
//!
//! Indexes every message and enum in a compilation request by its
//! fully-qualified name so that field references can be resolved to the
//! file and node that define them.
//!
//! ## Lifecycle
//! The registry is built once from the complete descriptor list and is
//! read-only afterwards. Resolution is a pure name lookup, which keeps
//! mutually-importing files from ever recursing into each other.
//!
//! ## Example
//! ```rust,ignore
//! use protoc_gen_tsd_registry::Registry;
//!
//! let registry = Registry::ingest(&request.proto_file)?;
//! let entry = registry.resolve(".google.protobuf.Timestamp")?;
//! assert_eq!(entry.file_name(), "google/protobuf/timestamp.proto");
//! ```

use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};
use protoc_gen_tsd_common::{Result, TsdError};
use std::collections::HashMap;
use tracing::debug;

/// Registered descriptor node
#[derive(Debug, Clone, Copy)]
pub enum TypeNode<'a> {
    Message(&'a DescriptorProto),
    Enum(&'a EnumDescriptorProto),
}

impl<'a> TypeNode<'a> {
    pub fn as_message(&self) -> Option<&'a DescriptorProto> {
        match *self {
            TypeNode::Message(message) => Some(message),
            TypeNode::Enum(_) => None,
        }
    }

    /// Whether this is a synthesized `map<K, V>` entry message
    pub fn is_map_entry(&self) -> bool {
        self.as_message()
            .and_then(|message| message.options.as_ref())
            .map(|options| options.map_entry())
            .unwrap_or(false)
    }
}

/// Where a fully-qualified name is defined
#[derive(Debug, Clone)]
pub struct RegistryEntry<'a> {
    /// File that declares the node
    pub file: &'a FileDescriptorProto,
    pub node: TypeNode<'a>,
    /// Fully-qualified name without the leading dot (e.g., "shop.Order.Line")
    pub full_name: String,
    /// Simple names from the outermost enclosing message down to the node
    /// itself (e.g., `["Order", "Line"]`)
    pub scope: Vec<String>,
}

impl<'a> RegistryEntry<'a> {
    pub fn file_name(&self) -> &'a str {
        self.file.name()
    }
}

/// Process-wide index from fully-qualified type name to its definition
#[derive(Debug, Default)]
pub struct Registry<'a> {
    files: HashMap<&'a str, &'a FileDescriptorProto>,
    types: HashMap<String, RegistryEntry<'a>>,
}

impl<'a> Registry<'a> {
    /// Register every message and enum of every file, nested ones included
    ///
    /// Fails when two nodes claim the same fully-qualified name or when the
    /// same file name is supplied twice.
    pub fn ingest(files: &'a [FileDescriptorProto]) -> Result<Self> {
        let mut registry = Registry::default();

        for file in files {
            if registry.files.insert(file.name(), file).is_some() {
                return Err(TsdError::DuplicateFile(file.name().to_string()));
            }

            for message in &file.message_type {
                registry.register_message(file, &[], message)?;
            }
            for enumeration in &file.enum_type {
                registry.register(file, &[], TypeNode::Enum(enumeration), enumeration.name())?;
            }
        }

        debug!(
            files = registry.files.len(),
            types = registry.types.len(),
            "descriptor registry built"
        );

        Ok(registry)
    }

    fn register_message(
        &mut self,
        file: &'a FileDescriptorProto,
        parent: &[String],
        message: &'a DescriptorProto,
    ) -> Result<()> {
        let scope = self.register(file, parent, TypeNode::Message(message), message.name())?;

        for nested in &message.nested_type {
            self.register_message(file, &scope, nested)?;
        }
        for enumeration in &message.enum_type {
            self.register(file, &scope, TypeNode::Enum(enumeration), enumeration.name())?;
        }

        Ok(())
    }

    fn register(
        &mut self,
        file: &'a FileDescriptorProto,
        parent: &[String],
        node: TypeNode<'a>,
        name: &str,
    ) -> Result<Vec<String>> {
        let mut scope = parent.to_vec();
        scope.push(name.to_string());
        let full_name = qualify(file.package(), &scope);

        if let Some(existing) = self.types.get(&full_name) {
            return Err(TsdError::DuplicateType {
                full_name,
                first: existing.file_name().to_string(),
                second: file.name().to_string(),
            });
        }

        self.types.insert(
            full_name.clone(),
            RegistryEntry {
                file,
                node,
                full_name,
                scope: scope.clone(),
            },
        );

        Ok(scope)
    }

    /// Look up a type by fully-qualified name
    ///
    /// Accepts both the `.pkg.Type` form protoc writes into `type_name` and
    /// the bare `pkg.Type` form.
    pub fn resolve(&self, type_name: &str) -> Result<&RegistryEntry<'a>> {
        let key = type_name.strip_prefix('.').unwrap_or(type_name);
        self.types.get(key).ok_or_else(|| TsdError::Resolution {
            type_name: type_name.to_string(),
        })
    }

    /// Look up an ingested file by name
    pub fn file(&self, name: &str) -> Option<&'a FileDescriptorProto> {
        self.files.get(name).copied()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Join a package and a scope into a dotted fully-qualified name
pub fn qualify(package: &str, scope: &[String]) -> String {
    let local = scope.join(".");
    if package.is_empty() {
        local
    } else {
        format!("{}.{}", package, local)
    }
}
