//! Template loading and management

use protoc_gen_tsd_common::{Result, TsType, TsdError};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Name of the `.d.ts` declaration template
pub const DECLARATION_TEMPLATE: &str = "proto_tsd.d.ts";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Output is TypeScript, never HTML
    tera.autoescape_on(vec![]);

    tera.register_filter("ts_type", ts_type_filter);

    tera.add_raw_template(
        DECLARATION_TEMPLATE,
        include_str!("../templates/proto_tsd.d.ts.tera"),
    )
    .map_err(|e| TsdError::Render {
        template: DECLARATION_TEMPLATE.to_string(),
        message: format!("failed to load template: {}", error_chain(&e)),
    })?;

    Ok(tera)
}

/// Filter to print a serialized `TsType` as TypeScript type syntax
fn ts_type_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let ts_type: TsType = serde_json::from_value(value.clone())
        .map_err(|e| tera::Error::msg(format!("ts_type filter expects a TsType: {}", e)))?;

    Ok(Value::String(ts_type.to_string()))
}

/// Flatten a Tera error and its causes into one line
pub(crate) fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}
