//! Type projection from protobuf descriptors to TypeScript declarations
//!
//! Walks one file's message and enum tree and builds the
//! [`DeclarationModel`] the renderer turns into a `.d.ts` file.
//!
//! ## Projection Rules
//! - Message → `export interface`, one optional member per field in field order
//! - Enum → `export enum`, constants in declaration order (values may repeat)
//! - Nested types → flattened names (`Order.Line` → `Order$Line`)
//! - `repeated T` → `T[]`, `map<K, V>` → `{ [key: K]: V }`
//! - Cross-file references → `alias.Name` plus an import of the owning file
//!
//! Every reference is resolved through the [`Registry`]; an unknown type
//! aborts projection of the whole file.

mod comments;
mod field_type;
mod imports;
pub mod names;

use comments::{
    child_path, CommentMap, FILE_ENUM_TYPE, FILE_MESSAGE_TYPE, ENUM_VALUE, MESSAGE_ENUM_TYPE,
    MESSAGE_FIELD, MESSAGE_NESTED_TYPE,
};
use field_type::scalar_type;
use imports::ImportSet;
use names::{declaration_name, member_name};
use prost_types::field_descriptor_proto::Label;
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto};
use protoc_gen_tsd_common::{
    Declaration, DeclarationModel, EnumConstant, EnumDeclaration, InterfaceDeclaration, Member,
    Result, TsType, TsdError,
};
use protoc_gen_tsd_registry::{qualify, Registry, RegistryEntry};
use std::collections::HashSet;
use tracing::debug;

/// Project one file into its declaration model
pub fn project(file: &FileDescriptorProto, registry: &Registry<'_>) -> Result<DeclarationModel> {
    FileFormatter::new(file, registry).format()
}

/// Per-file projection state, discarded once the model is built
struct FileFormatter<'f, 'a> {
    file: &'f FileDescriptorProto,
    registry: &'f Registry<'a>,
    comments: CommentMap,
    imports: ImportSet,
    declarations: Vec<Declaration>,
    declared: HashSet<String>,
}

impl<'f, 'a> FileFormatter<'f, 'a> {
    fn new(file: &'f FileDescriptorProto, registry: &'f Registry<'a>) -> Self {
        Self {
            file,
            registry,
            comments: CommentMap::from_file(file),
            imports: ImportSet::new(file.name()),
            declarations: Vec::new(),
            declared: HashSet::new(),
        }
    }

    fn format(mut self) -> Result<DeclarationModel> {
        let file = self.file;

        for (index, message) in file.message_type.iter().enumerate() {
            self.format_message(message, &[], &child_path(&[], FILE_MESSAGE_TYPE, index))?;
        }
        for (index, enumeration) in file.enum_type.iter().enumerate() {
            self.format_enum(enumeration, &[], &child_path(&[], FILE_ENUM_TYPE, index))?;
        }

        debug!(
            file = file.name(),
            declarations = self.declarations.len(),
            "projected file"
        );

        let syntax = match file.syntax() {
            "" => "proto2",
            syntax => syntax,
        };

        Ok(DeclarationModel {
            file_name: file.name().to_string(),
            package: file.package().to_string(),
            syntax: syntax.to_string(),
            imports: self.imports.into_vec(),
            declarations: self.declarations,
        })
    }

    fn format_message(
        &mut self,
        message: &DescriptorProto,
        parent: &[String],
        path: &[i32],
    ) -> Result<()> {
        let is_map_entry = message
            .options
            .as_ref()
            .map(|options| options.map_entry())
            .unwrap_or(false);
        if is_map_entry {
            return Ok(());
        }

        let mut scope = parent.to_vec();
        scope.push(message.name().to_string());
        let full_name = qualify(self.file.package(), &scope);

        let mut members = Vec::with_capacity(message.field.len());
        for (index, field) in message.field.iter().enumerate() {
            let ts_type = self
                .field_type(field)
                .map_err(|source| TsdError::Projection {
                    file: self.file.name().to_string(),
                    member: format!("{}.{}", full_name, field.name()),
                    source: Box::new(source),
                })?;

            let deprecated = field
                .options
                .as_ref()
                .map(|options| options.deprecated())
                .unwrap_or(false);

            members.push(Member {
                name: member_name(field.name(), field.json_name.as_deref()),
                ts_type,
                doc: self
                    .comments
                    .doc(&child_path(path, MESSAGE_FIELD, index), deprecated),
                oneof: oneof_name(message, field),
            });
        }

        let deprecated = message
            .options
            .as_ref()
            .map(|options| options.deprecated())
            .unwrap_or(false);

        self.declare(Declaration::Interface(InterfaceDeclaration {
            name: declaration_name(&scope),
            full_name,
            doc: self.comments.doc(path, deprecated),
            members,
        }))?;

        for (index, nested) in message.nested_type.iter().enumerate() {
            self.format_message(nested, &scope, &child_path(path, MESSAGE_NESTED_TYPE, index))?;
        }
        for (index, enumeration) in message.enum_type.iter().enumerate() {
            self.format_enum(enumeration, &scope, &child_path(path, MESSAGE_ENUM_TYPE, index))?;
        }

        Ok(())
    }

    fn format_enum(
        &mut self,
        enumeration: &EnumDescriptorProto,
        parent: &[String],
        path: &[i32],
    ) -> Result<()> {
        let mut scope = parent.to_vec();
        scope.push(enumeration.name().to_string());

        let constants = enumeration
            .value
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let deprecated = value
                    .options
                    .as_ref()
                    .map(|options| options.deprecated())
                    .unwrap_or(false);

                EnumConstant {
                    name: value.name().to_string(),
                    value: value.number(),
                    doc: self
                        .comments
                        .doc(&child_path(path, ENUM_VALUE, index), deprecated),
                }
            })
            .collect();

        let deprecated = enumeration
            .options
            .as_ref()
            .map(|options| options.deprecated())
            .unwrap_or(false);

        self.declare(Declaration::Enum(EnumDeclaration {
            name: declaration_name(&scope),
            full_name: qualify(self.file.package(), &scope),
            doc: self.comments.doc(path, deprecated),
            constants,
        }))
    }

    fn declare(&mut self, declaration: Declaration) -> Result<()> {
        if !self.declared.insert(declaration.name().to_string()) {
            return Err(TsdError::DuplicateDeclaration {
                file: self.file.name().to_string(),
                name: declaration.name().to_string(),
            });
        }

        self.declarations.push(declaration);
        Ok(())
    }

    fn field_type(&mut self, field: &FieldDescriptorProto) -> Result<TsType> {
        let repeated = field.label() == Label::Repeated;

        if let Some(scalar) = scalar_type(field) {
            return Ok(if repeated {
                TsType::array(scalar)
            } else {
                scalar
            });
        }

        // Message, group or enum: only the registry knows where it lives
        let registry = self.registry;
        let entry = registry.resolve(field.type_name())?;

        if repeated && entry.node.is_map_entry() {
            return self.map_type(entry);
        }

        let reference = self.reference(entry);
        Ok(if repeated {
            TsType::array(reference)
        } else {
            reference
        })
    }

    fn map_type(&mut self, entry: &RegistryEntry<'_>) -> Result<TsType> {
        let message = entry
            .node
            .as_message()
            .ok_or_else(|| TsdError::MalformedMapEntry(entry.full_name.clone()))?;

        let key = message.field.iter().find(|field| field.number() == 1);
        let value = message.field.iter().find(|field| field.number() == 2);
        let (Some(key), Some(value)) = (key, value) else {
            return Err(TsdError::MalformedMapEntry(entry.full_name.clone()));
        };

        Ok(TsType::map(self.field_type(key)?, self.field_type(value)?))
    }

    fn reference(&mut self, entry: &RegistryEntry<'_>) -> TsType {
        let local = declaration_name(&entry.scope);

        if entry.file_name() == self.file.name() {
            TsType::reference(local)
        } else {
            let alias = self.imports.require(entry.file_name());
            TsType::reference(format!("{}.{}", alias, local))
        }
    }
}

/// Oneof group a field belongs to, ignoring proto3 `optional` wrappers
fn oneof_name(message: &DescriptorProto, field: &FieldDescriptorProto) -> Option<String> {
    if field.proto3_optional() {
        return None;
    }

    let index = usize::try_from(field.oneof_index?).ok()?;
    message
        .oneof_decl
        .get(index)
        .map(|oneof| oneof.name().to_string())
}
