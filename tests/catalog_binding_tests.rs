//! Catalog Binding Tests
//!
//! Whole-catalog checks that every declared tool binds and builds cleanly
//! from well-formed arguments, and that the binder rejects missing required
//! arguments and unknown keys with errors naming the offending parameter.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value, json};

use elevenlabs_gateway::core::{
    AUTH_HEADER, ErrorKind, ParamKind, RequestContext, ToolDescriptor, ToolRegistry, bind, build,
};

fn sample_value(kind: &ParamKind) -> Value {
    match kind {
        ParamKind::String => json!("sample"),
        ParamKind::Integer => json!(42),
        ParamKind::Boolean => json!(true),
        ParamKind::Enum(allowed) => json!(allowed[0]),
        ParamKind::Object => json!({"key": "value"}),
        ParamKind::File => json!({
            "data": BASE64.encode(b"sample bytes"),
            "file_name": "sample.bin",
        }),
    }
}

fn full_args(descriptor: &ToolDescriptor) -> Map<String, Value> {
    descriptor
        .params
        .iter()
        .map(|param| (param.name.to_string(), sample_value(&param.kind)))
        .collect()
}

fn context() -> RequestContext {
    RequestContext::new("https://api.elevenlabs.io", "test-api-key")
}

#[test]
fn test_every_tool_binds_and_builds_with_full_arguments() {
    let registry = ToolRegistry::builtin().unwrap();
    for descriptor in registry.tools() {
        let bound = bind(descriptor, &full_args(descriptor))
            .unwrap_or_else(|e| panic!("{} failed to bind: {e}", descriptor.name));
        let request = build(descriptor, bound, &context())
            .unwrap_or_else(|e| panic!("{} failed to build: {e}", descriptor.name));

        assert_eq!(request.method, descriptor.method, "{}", descriptor.name);
        assert!(
            request
                .headers
                .iter()
                .any(|(name, value)| name == AUTH_HEADER && value == "test-api-key"),
            "{} request lacks the credential header",
            descriptor.name
        );
    }
}

#[test]
fn test_dropping_any_required_argument_is_a_validation_error() {
    let registry = ToolRegistry::builtin().unwrap();
    for descriptor in registry.tools() {
        for param in &descriptor.params {
            if !param.required || param.default.is_some() {
                continue;
            }
            let mut args = full_args(descriptor);
            args.remove(param.name);

            let err = match bind(descriptor, &args) {
                Ok(_) => panic!("{} bound without required '{}'", descriptor.name, param.name),
                Err(e) => e,
            };
            assert_eq!(err.kind(), ErrorKind::Validation, "{}", descriptor.name);
            assert!(
                err.to_string().contains(param.name),
                "{} error does not name '{}': {err}",
                descriptor.name,
                param.name
            );
        }
    }
}

#[test]
fn test_unknown_argument_is_rejected_for_every_tool() {
    let registry = ToolRegistry::builtin().unwrap();
    for descriptor in registry.tools() {
        let mut args = full_args(descriptor);
        args.insert("bogus_extra".to_string(), json!(1));

        let err = bind(descriptor, &args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{}", descriptor.name);
        assert!(
            err.to_string().contains("bogus_extra"),
            "{} error does not name the unknown key: {err}",
            descriptor.name
        );
    }
}

#[test]
fn test_building_twice_from_the_same_arguments_is_identical() {
    let registry = ToolRegistry::builtin().unwrap();
    for name in ["convert", "add_voice", "get_characters_usage_metrics"] {
        let descriptor = registry.lookup(name).unwrap();
        let args = full_args(descriptor);

        let first = build(descriptor, bind(descriptor, &args).unwrap(), &context()).unwrap();
        let second = build(descriptor, bind(descriptor, &args).unwrap(), &context()).unwrap();
        assert_eq!(first, second, "{name} build is not deterministic");
    }
}
