//! Scalar type table

use prost_types::field_descriptor_proto::Type;
use prost_types::field_options::JsType;
use prost_types::FieldDescriptorProto;
use protoc_gen_tsd_common::TsType;

/// TypeScript type for a scalar field kind
///
/// Returns `None` for message, group and enum kinds, which are resolved
/// through the registry instead.
pub fn scalar_type(field: &FieldDescriptorProto) -> Option<TsType> {
    let kind = Type::try_from(field.r#type?).ok()?;

    Some(match kind {
        Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64
            if is_js_string(field) =>
        {
            TsType::String
        }
        Type::Double
        | Type::Float
        | Type::Int32
        | Type::Int64
        | Type::Uint32
        | Type::Uint64
        | Type::Sint32
        | Type::Sint64
        | Type::Fixed32
        | Type::Fixed64
        | Type::Sfixed32
        | Type::Sfixed64 => TsType::Number,
        Type::Bool => TsType::Boolean,
        Type::String => TsType::String,
        Type::Bytes => TsType::Bytes,
        Type::Message | Type::Group | Type::Enum => return None,
    })
}

/// Whether the field asks for its 64-bit value to be carried as a string
fn is_js_string(field: &FieldDescriptorProto) -> bool {
    field
        .options
        .as_ref()
        .map(|options| options.jstype() == JsType::JsString)
        .unwrap_or(false)
}
