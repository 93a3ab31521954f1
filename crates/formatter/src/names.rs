//! Naming rules for generated declarations, members and imports

/// Separator between enclosing-message names in a flattened declaration name
///
/// `$` never occurs in a protobuf identifier, so distinct scopes always
/// flatten to distinct names.
pub const SCOPE_SEPARATOR: &str = "$";

const PROTO_SUFFIX: &str = ".proto";

/// Names that cannot be used as an interface or enum name: ECMAScript
/// reserved words, strict-mode reserved words and TypeScript built-in types
const RESERVED_TYPE_NAMES: &[&str] = &[
    // ECMAScript
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "new", "null", "return", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
    "yield",
    // Strict mode
    "implements", "interface", "let", "package", "private", "protected", "public", "static",
    // TypeScript built-in types
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol",
    "undefined", "unknown",
];

/// Flatten a nested scope into one declaration name
///
/// `["Order", "Line"]` becomes `Order$Line`.
pub fn declaration_name(scope: &[String]) -> String {
    sanitize_declaration_name(&scope.join(SCOPE_SEPARATOR))
}

/// Append the scope separator to reserved names
///
/// `class` becomes `class$`, which no protobuf name can flatten to.
pub fn sanitize_declaration_name(name: &str) -> String {
    if RESERVED_TYPE_NAMES.contains(&name) {
        format!("{}{}", name, SCOPE_SEPARATOR)
    } else {
        name.to_string()
    }
}

/// Property name for a field, quoted when it is not a plain identifier
pub fn member_name(field_name: &str, json_name: Option<&str>) -> String {
    let name = match json_name {
        Some(json) if !json.is_empty() => json.to_string(),
        _ => to_lower_camel_case(field_name),
    };

    if is_identifier(&name) {
        name
    } else {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Convert snake_case to lowerCamelCase the way protoc derives `json_name`
pub fn to_lower_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = false;

    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

/// Strip the `.proto` suffix, leaving other names untouched
pub fn strip_proto_suffix(file_name: &str) -> &str {
    file_name.strip_suffix(PROTO_SUFFIX).unwrap_or(file_name)
}

/// Namespace alias for an imported file
///
/// `google/protobuf/timestamp.proto` becomes `google_protobuf_timestamp_pb`.
pub fn import_alias(file_name: &str) -> String {
    let stem: String = strip_proto_suffix(file_name)
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();

    if stem.starts_with(|ch: char| ch.is_ascii_digit()) {
        format!("_{}_pb", stem)
    } else {
        format!("{}_pb", stem)
    }
}

/// Module specifier for `target` as seen from the file `from`
///
/// Both names are protoc-relative paths. The result points at the target's
/// generated declaration file without its extension.
pub fn import_path(from: &str, target: &str) -> String {
    let from_dirs: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target_parts: Vec<&str> = strip_proto_suffix(target).split('/').collect();
    let (target_dirs, target_stem) = target_parts.split_at(target_parts.len() - 1);

    let common = from_dirs
        .iter()
        .zip(target_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = Vec::new();
    let climbs = from_dirs.len() - common;
    if climbs == 0 {
        segments.push(".");
    } else {
        segments.extend(std::iter::repeat("..").take(climbs));
    }
    segments.extend(&target_dirs[common..]);
    segments.extend(target_stem);

    segments.join("/")
}
