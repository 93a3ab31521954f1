//! Integration test for the plugin driver

use mockall::mock;
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, ServiceDescriptorProto,
};
use protoc_gen_tsd::{
    generate, DriverState, PluginDriver, Renderer, TemplateRenderer, DECLARATION_TEMPLATE,
};
use protoc_gen_tsd_common::{DeclarationModel, Result, TsdError};

mock! {
    pub Sink {}

    impl Renderer for Sink {
        fn render(&self, template: &str, model: &DeclarationModel) -> Result<String>;
    }
}

fn field(name: &str, number: i32, label: Label, kind: Type, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(kind as i32),
        type_name: type_name.map(str::to_string),
        ..Default::default()
    }
}

fn common_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common/money.proto".to_string()),
        package: Some("common".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Money".to_string()),
            field: vec![
                field("currency_code", 1, Label::Optional, Type::String, None),
                field("units", 2, Label::Optional, Type::Int64, None),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn order_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("shop/order.proto".to_string()),
        package: Some("shop".to_string()),
        dependency: vec!["common/money.proto".to_string()],
        message_type: vec![DescriptorProto {
            name: Some("Order".to_string()),
            field: vec![
                field("id", 1, Label::Optional, Type::String, None),
                field("total", 2, Label::Optional, Type::Message, Some(".common.Money")),
                field("notes", 3, Label::Repeated, Type::String, None),
                field("state", 4, Label::Optional, Type::Enum, Some(".shop.State")),
            ],
            ..Default::default()
        }],
        enum_type: vec![EnumDescriptorProto {
            name: Some("State".to_string()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("OK".to_string()),
                    number: Some(0),
                    ..Default::default()
                },
                EnumValueDescriptorProto {
                    name: Some("FAIL".to_string()),
                    number: Some(1),
                    ..Default::default()
                },
                EnumValueDescriptorProto {
                    name: Some("ALSO_ONE".to_string()),
                    number: Some(1),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        // Services are not part of the generated declarations
        service: vec![ServiceDescriptorProto {
            name: Some("Orders".to_string()),
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn create_request(files_to_generate: &[&str]) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: files_to_generate.iter().map(|f| f.to_string()).collect(),
        proto_file: vec![common_file(), order_file()],
        ..Default::default()
    }
}

fn run_plugin(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let mut driver = PluginDriver::new(TemplateRenderer::new().unwrap());
    let output = driver.run(&request.encode_to_vec()).unwrap();
    assert_eq!(driver.state(), DriverState::Done);
    CodeGeneratorResponse::decode(output.as_slice()).unwrap()
}

#[test]
fn test_one_output_per_requested_file_in_order() {
    let request = create_request(&["shop/order.proto", "common/money.proto"]);
    let response = run_plugin(&request);

    let names: Vec<&str> = response.file.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["shop/order.d.ts", "common/money.d.ts"]);
    assert!(response.error.is_none());
}

#[test]
fn test_only_requested_files_are_generated() {
    let request = create_request(&["shop/order.proto"]);
    let response = run_plugin(&request);

    assert_eq!(response.file.len(), 1);
    assert_eq!(response.file[0].name(), "shop/order.d.ts");
}

#[test]
fn test_generated_content_imports_dependency() {
    let request = create_request(&["shop/order.proto"]);
    let response = run_plugin(&request);
    let content = response.file[0].content();

    assert!(content.contains("// file: shop/order.proto"));
    assert!(content.contains("import * as common_money_pb from \"../common/money\";"));
    assert!(content.contains("export interface Order {"));
    assert!(content.contains("  total?: common_money_pb.Money;"));
    assert!(content.contains("  notes?: string[];"));
    assert!(content.contains("  state?: State;"));
    assert!(content.contains("  ALSO_ONE = 1,"));
    assert!(!content.contains("Orders"), "services must not be generated");
}

#[test]
fn test_response_is_deterministic() {
    let request = create_request(&["shop/order.proto", "common/money.proto"]);
    let bytes = request.encode_to_vec();

    let first = PluginDriver::new(TemplateRenderer::new().unwrap())
        .run(&bytes)
        .unwrap();
    let second = PluginDriver::new(TemplateRenderer::new().unwrap())
        .run(&bytes)
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_bad_input_fails_without_response() {
    let mut driver = PluginDriver::new(TemplateRenderer::new().unwrap());
    // Field 15 with wire type 2 and a length running past the end
    let result = driver.run(&[0x7a, 0x05, 0x01]);

    assert!(matches!(result, Err(TsdError::Decode(_))));
    assert_eq!(driver.state(), DriverState::Failed);
}

#[test]
fn test_unresolved_reference_fails_whole_invocation() {
    // Money's file is missing from the descriptor list
    let request = CodeGeneratorRequest {
        file_to_generate: vec!["shop/order.proto".to_string()],
        proto_file: vec![order_file()],
        ..Default::default()
    };

    let mut driver = PluginDriver::new(TemplateRenderer::new().unwrap());
    let err = driver.run(&request.encode_to_vec()).unwrap_err();

    assert!(err.is_resolution());
    assert_eq!(driver.state(), DriverState::Failed);
}

#[test]
fn test_missing_target_file() {
    let request = CodeGeneratorRequest {
        file_to_generate: vec!["nowhere.proto".to_string()],
        proto_file: vec![common_file()],
        ..Default::default()
    };

    let err = generate(&request, &TemplateRenderer::new().unwrap()).unwrap_err();
    assert!(matches!(err, TsdError::MissingFile(name) if name == "nowhere.proto"));
}

#[test]
fn test_renderer_receives_models_in_request_order() {
    let mut renderer = MockSink::new();
    let mut sequence = mockall::Sequence::new();

    renderer
        .expect_render()
        .withf(|template, model| {
            template == DECLARATION_TEMPLATE && model.file_name == "common/money.proto"
        })
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok("money".to_string()));
    renderer
        .expect_render()
        .withf(|_, model| model.file_name == "shop/order.proto" && model.imports.len() == 1)
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok("order".to_string()));

    let request = create_request(&["common/money.proto", "shop/order.proto"]);
    let response = generate(&request, &renderer).unwrap();

    let contents: Vec<&str> = response.file.iter().map(|f| f.content()).collect();
    assert_eq!(contents, vec!["money", "order"]);
}

#[test]
fn test_render_failure_emits_no_partial_response() {
    let mut renderer = MockSink::new();
    renderer
        .expect_render()
        .withf(|_, model| model.file_name == "common/money.proto")
        .times(1)
        .returning(|_, _| Ok("money".to_string()));
    renderer
        .expect_render()
        .withf(|_, model| model.file_name == "shop/order.proto")
        .times(1)
        .returning(|template, _| {
            Err(TsdError::Render {
                template: template.to_string(),
                message: "contract violated".to_string(),
            })
        });

    let request = create_request(&["common/money.proto", "shop/order.proto"]);
    let mut driver = PluginDriver::new(renderer);
    let result = driver.run(&request.encode_to_vec());

    assert!(matches!(result, Err(TsdError::Render { .. })));
    assert_eq!(driver.state(), DriverState::Failed);
}

#[test]
fn test_driver_cannot_be_reused() {
    let request = create_request(&["common/money.proto"]);
    let bytes = request.encode_to_vec();

    let mut driver = PluginDriver::new(TemplateRenderer::new().unwrap());
    assert!(driver.run(&bytes).is_ok());
    assert!(matches!(driver.run(&bytes), Err(TsdError::DriverReused)));
    assert_eq!(driver.state(), DriverState::Done);
}
