//! protoc plugin driver
//!
//! Owns the request/response lifecycle of one plugin invocation: decode the
//! whole `CodeGeneratorRequest`, build the descriptor registry, project and
//! render every file to generate in request order, and encode the
//! `CodeGeneratorResponse`. Output is all-or-nothing; a failure on any file
//! produces no response at all.

use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};
use protoc_gen_tsd_common::{Result, TsdError};
use protoc_gen_tsd_formatter::{names::strip_proto_suffix, project};
use protoc_gen_tsd_registry::Registry;
use tracing::{debug, warn};

pub use protoc_gen_tsd_generator::{Renderer, TemplateRenderer, DECLARATION_TEMPLATE};

/// Suffix of every generated file
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Lifecycle of a plugin invocation; there is no way back to `Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Processing,
    Done,
    Failed,
}

/// Single-use driver for one plugin invocation
pub struct PluginDriver<R: Renderer> {
    renderer: R,
    state: DriverState,
}

impl<R: Renderer> PluginDriver<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Turn encoded request bytes into encoded response bytes
    pub fn run(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if self.state != DriverState::Idle {
            return Err(TsdError::DriverReused);
        }

        self.transition(DriverState::Processing);
        match self.process(input) {
            Ok(output) => {
                self.transition(DriverState::Done);
                Ok(output)
            }
            Err(err) => {
                self.transition(DriverState::Failed);
                Err(err)
            }
        }
    }

    fn process(&self, input: &[u8]) -> Result<Vec<u8>> {
        let request = CodeGeneratorRequest::decode(input).map_err(TsdError::Decode)?;
        let response = generate(&request, &self.renderer)?;

        let mut output = Vec::with_capacity(response.encoded_len());
        response.encode(&mut output).map_err(TsdError::Encode)?;
        Ok(output)
    }

    fn transition(&mut self, next: DriverState) {
        debug!(from = ?self.state, to = ?next, "plugin driver state");
        self.state = next;
    }
}

/// Generate one declaration file per file to generate, in request order
pub fn generate<R: Renderer + ?Sized>(
    request: &CodeGeneratorRequest,
    renderer: &R,
) -> Result<CodeGeneratorResponse> {
    if let Some(parameter) = request.parameter.as_deref().filter(|p| !p.is_empty()) {
        warn!(parameter, "protoc-gen-tsd takes no parameters, ignoring");
    }

    let registry = Registry::ingest(&request.proto_file)?;

    let mut files = Vec::with_capacity(request.file_to_generate.len());
    for file_name in &request.file_to_generate {
        let file = registry
            .file(file_name)
            .ok_or_else(|| TsdError::MissingFile(file_name.clone()))?;

        let model = project(file, &registry)?;
        let content = renderer.render(DECLARATION_TEMPLATE, &model)?;
        let name = output_file_name(file_name);

        debug!(source = %file_name, output = %name, "generated declaration file");

        files.push(code_generator_response::File {
            name: Some(name),
            content: Some(content),
            ..Default::default()
        });
    }

    Ok(CodeGeneratorResponse {
        supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
        file: files,
        ..Default::default()
    })
}

/// `shop/order.proto` → `shop/order.d.ts`
pub fn output_file_name(file_name: &str) -> String {
    format!("{}{}", strip_proto_suffix(file_name), DECLARATION_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("shop/order.proto"), "shop/order.d.ts");
        assert_eq!(output_file_name("order.proto"), "order.d.ts");
        assert_eq!(output_file_name("v1.proto.proto"), "v1.proto.d.ts");
        assert_eq!(output_file_name("schema"), "schema.d.ts");
    }

    #[test]
    fn test_driver_starts_idle() {
        let driver = PluginDriver::new(TemplateRenderer::new().unwrap());
        assert_eq!(driver.state(), DriverState::Idle);
    }

    #[test]
    fn test_empty_request_yields_empty_response() {
        let request = CodeGeneratorRequest::default();
        let response = generate(&request, &TemplateRenderer::new().unwrap()).unwrap();

        assert!(response.file.is_empty());
        assert!(response.error.is_none());
        assert_eq!(response.supported_features, Some(1));
    }
}
