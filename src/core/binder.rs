//! Argument validation and coercion
//!
//! The binder is the single chokepoint where the host's loosely-typed
//! argument map becomes strongly-typed data. Arguments are checked against
//! the tool's parameter specs, coerced to their declared kinds, and
//! partitioned by wire location into a [`BoundRequest`]. Unknown keys are
//! rejected rather than ignored so caller mistakes surface immediately.
//!
//! The only I/O performed here is reading file-typed parameters from the
//! local filesystem; nothing touches the network before binding succeeds.

use std::collections::HashMap;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::core::error::{ToolError, ToolResult};
use crate::core::schema::{ParamKind, ParamLocation, ParameterSpec, ToolDescriptor};

/// File content bound to a file-located parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// Multipart part name (the parameter name)
    pub field: String,
    /// File name attached to the part
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Validated, coerced arguments partitioned by wire location
///
/// Owned by exactly one invocation and consumed by the request builder.
/// Query pairs keep the schema's declaration order and the body map is
/// key-ordered, so identical inputs always produce identical requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundRequest {
    pub path: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Map<String, Value>,
    pub files: Vec<FilePayload>,
}

/// Validate and coerce an argument map against a tool contract
pub fn bind(descriptor: &ToolDescriptor, args: &Map<String, Value>) -> ToolResult<BoundRequest> {
    for key in args.keys() {
        if descriptor.param(key).is_none() {
            return Err(ToolError::unknown_parameter(descriptor.name, key));
        }
    }

    let mut bound = BoundRequest::default();
    for spec in &descriptor.params {
        let value = match args.get(spec.name).or(spec.default.as_ref()) {
            Some(value) => value,
            None if spec.required => {
                return Err(ToolError::missing_parameter(descriptor.name, spec.name));
            }
            None => continue,
        };

        match spec.location {
            ParamLocation::Path => {
                let coerced = coerce(spec, value)?;
                bound
                    .path
                    .insert(spec.name.to_string(), url_component(spec.name, &coerced)?);
            }
            ParamLocation::Query => {
                let coerced = coerce(spec, value)?;
                bound
                    .query
                    .push((spec.name.to_string(), url_component(spec.name, &coerced)?));
            }
            ParamLocation::Body => {
                let coerced = coerce(spec, value)?;
                bound.body.insert(spec.name.to_string(), coerced);
            }
            ParamLocation::File => {
                bound.files.push(bind_file(spec.name, value)?);
            }
        }
    }
    Ok(bound)
}

// =============================================================================
// Coercion
// =============================================================================

fn coerce(spec: &ParameterSpec, value: &Value) -> ToolResult<Value> {
    match spec.kind {
        ParamKind::String => coerce_string(spec.name, value),
        ParamKind::Integer => coerce_integer(spec.name, value),
        ParamKind::Boolean => coerce_boolean(spec.name, value),
        ParamKind::Enum(allowed) => coerce_enum(spec.name, value, allowed),
        ParamKind::Object => coerce_object(spec.name, value),
        // File params never reach here; bind() routes them to bind_file
        ParamKind::File => Err(ToolError::internal(format!(
            "file parameter '{}' coerced as a scalar",
            spec.name
        ))),
    }
}

fn coerce_string(param: &str, value: &Value) -> ToolResult<Value> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(ToolError::invalid_parameter(
            param,
            format!("expected a string, got {}", json_type(other)),
        )),
    }
}

fn coerce_integer(param: &str, value: &Value) -> ToolResult<Value> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::from(i));
            }
            // Accept floats with no fractional part (JSON hosts often send 5.0)
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f <= i64::MAX as f64
            {
                return Ok(Value::from(f as i64));
            }
            Err(ToolError::invalid_parameter(
                param,
                format!("expected an integer, got {n}"),
            ))
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::from(i));
            }
            if let Some(unix) = parse_timestamp(trimmed) {
                return Ok(Value::from(unix));
            }
            Err(ToolError::invalid_parameter(
                param,
                format!("expected an integer or timestamp, got '{s}'"),
            ))
        }
        other => Err(ToolError::invalid_parameter(
            param,
            format!("expected an integer, got {}", json_type(other)),
        )),
    }
}

/// Parse an RFC 3339 instant or a plain `YYYY-MM-DD` date into Unix seconds
fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant.timestamp());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    // Midnight UTC; the usage endpoints only care about day granularity
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp())
}

fn coerce_boolean(param: &str, value: &Value) -> ToolResult<Value> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        other => Err(ToolError::invalid_parameter(
            param,
            format!("expected a boolean, got {}", json_type(other)),
        )),
    }
}

fn coerce_enum(param: &str, value: &Value, allowed: &'static [&'static str]) -> ToolResult<Value> {
    let Value::String(s) = value else {
        return Err(ToolError::invalid_parameter(
            param,
            format!("expected one of [{}]", allowed.join(", ")),
        ));
    };
    if allowed.contains(&s.as_str()) {
        Ok(value.clone())
    } else {
        Err(ToolError::invalid_parameter(
            param,
            format!("'{}' is not one of [{}]", s, allowed.join(", ")),
        ))
    }
}

fn coerce_object(param: &str, value: &Value) -> ToolResult<Value> {
    if value.is_object() || value.is_array() {
        Ok(value.clone())
    } else {
        Err(ToolError::invalid_parameter(
            param,
            format!("expected a JSON object or array, got {}", json_type(value)),
        ))
    }
}

/// Render an already-coerced scalar as a URL path/query component
fn url_component(param: &str, value: &Value) -> ToolResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ToolError::invalid_parameter(
            param,
            format!("{} cannot travel in the URL", json_type(other)),
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// File parameters
// =============================================================================

/// Read a file argument into bytes
///
/// Accepts a string (treated as a filesystem path and read fully, with the
/// handle closed before returning) or an object
/// `{"data": <base64>, "file_name": <optional>}` for inline content.
fn bind_file(param: &str, value: &Value) -> ToolResult<FilePayload> {
    match value {
        Value::String(path) => {
            let bytes = std::fs::read(path)
                .map_err(|e| ToolError::file_read(param, format!("{path}: {e}")))?;
            let file_name = Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            Ok(FilePayload {
                field: param.to_string(),
                file_name,
                bytes,
            })
        }
        Value::Object(_) => {
            use serde::Deserialize;

            #[derive(Deserialize)]
            struct InlineFile {
                data: String,
                file_name: Option<String>,
            }

            let inline = InlineFile::deserialize(value).map_err(|e| {
                ToolError::invalid_parameter(param, format!("invalid file object: {e}"))
            })?;
            let bytes = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
                ToolError::invalid_parameter(param, format!("invalid base64 data: {e}"))
            })?;
            Ok(FilePayload {
                field: param.to_string(),
                file_name: inline.file_name.unwrap_or_else(|| "upload".to_string()),
                bytes,
            })
        }
        other => Err(ToolError::invalid_parameter(
            param,
            format!(
                "expected a file path or {{data, file_name}} object, got {}",
                json_type(other)
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use http::Method;
    use serde_json::json;

    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::schema::{ResponseKind, ToolDescriptor};

    fn convert_tool() -> ToolDescriptor {
        ToolDescriptor::new(
            "convert",
            Method::POST,
            "/v1/text-to-speech/{voice_id}",
            vec![
                ParameterSpec::path("voice_id"),
                ParameterSpec::query_integer("optimize_streaming_latency"),
                ParameterSpec::query_enum("output_format", &["mp3_44100_128", "pcm_16000"]),
                ParameterSpec::body_string("text").required(),
                ParameterSpec::body_object("voice_settings"),
            ],
            ResponseKind::Binary,
        )
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_bind_partitions_by_location() {
        let tool = convert_tool();
        let bound = bind(
            &tool,
            &args(json!({
                "voice_id": "v1",
                "optimize_streaming_latency": 2,
                "output_format": "pcm_16000",
                "text": "hello",
                "voice_settings": {"stability": 0.5},
            })),
        )
        .unwrap();

        assert_eq!(bound.path["voice_id"], "v1");
        assert_eq!(
            bound.query,
            vec![
                ("optimize_streaming_latency".to_string(), "2".to_string()),
                ("output_format".to_string(), "pcm_16000".to_string()),
            ]
        );
        assert_eq!(bound.body["text"], json!("hello"));
        assert_eq!(bound.body["voice_settings"], json!({"stability": 0.5}));
        assert!(bound.files.is_empty());
    }

    #[test]
    fn test_missing_required_parameter() {
        let tool = convert_tool();
        let err = bind(&tool, &args(json!({"voice_id": "v1"}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("text"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let tool = convert_tool();
        let err = bind(
            &tool,
            &args(json!({"voice_id": "v1", "text": "hi", "texxt": "typo"})),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("texxt"));
    }

    #[test]
    fn test_optional_absent_is_omitted() {
        let tool = convert_tool();
        let bound = bind(&tool, &args(json!({"voice_id": "v1", "text": "hi"}))).unwrap();
        assert!(bound.query.is_empty());
        assert!(!bound.body.contains_key("voice_settings"));
    }

    #[test]
    fn test_default_substituted_when_absent() {
        let tool = ToolDescriptor::new(
            "dub",
            Method::POST,
            "/v1/dubbing",
            vec![
                ParameterSpec::body_string("source_lang").with_default(json!("auto")),
                ParameterSpec::body_string("target_lang").required(),
            ],
            ResponseKind::Json,
        );
        let bound = bind(&tool, &args(json!({"target_lang": "es"}))).unwrap();
        assert_eq!(bound.body["source_lang"], json!("auto"));

        let bound = bind(
            &tool,
            &args(json!({"target_lang": "es", "source_lang": "en"})),
        )
        .unwrap();
        assert_eq!(bound.body["source_lang"], json!("en"));
    }

    #[test]
    fn test_integer_coercions() {
        let spec = ParameterSpec::query_integer("start_unix");
        assert_eq!(coerce(&spec, &json!(1704067200)).unwrap(), json!(1704067200));
        assert_eq!(coerce(&spec, &json!("42")).unwrap(), json!(42));
        assert_eq!(coerce(&spec, &json!(5.0)).unwrap(), json!(5));
        assert_eq!(
            coerce(&spec, &json!("2024-01-01T00:00:00Z")).unwrap(),
            json!(1704067200)
        );
        assert_eq!(
            coerce(&spec, &json!("2024-01-01")).unwrap(),
            json!(1704067200)
        );
        assert!(coerce(&spec, &json!(1.5)).is_err());
        assert!(coerce(&spec, &json!("not a number")).is_err());
    }

    #[test]
    fn test_boolean_coercions() {
        let spec = ParameterSpec::query_boolean("with_settings");
        assert_eq!(coerce(&spec, &json!(true)).unwrap(), json!(true));
        assert_eq!(coerce(&spec, &json!("True")).unwrap(), json!(true));
        assert_eq!(coerce(&spec, &json!("false")).unwrap(), json!(false));
        assert!(coerce(&spec, &json!(1)).is_err());
    }

    #[test]
    fn test_string_coercions() {
        let spec = ParameterSpec::body_string("accent_strength");
        assert_eq!(coerce(&spec, &json!("1.5")).unwrap(), json!("1.5"));
        assert_eq!(coerce(&spec, &json!(1.5)).unwrap(), json!("1.5"));
        assert!(coerce(&spec, &json!({"x": 1})).is_err());
    }

    #[test]
    fn test_enum_membership() {
        let spec = ParameterSpec::query_enum("gender", &["male", "female"]);
        assert_eq!(coerce(&spec, &json!("male")).unwrap(), json!("male"));
        let err = coerce(&spec, &json!("robot")).unwrap_err();
        assert!(err.to_string().contains("male, female"));
    }

    #[test]
    fn test_object_accepts_arrays() {
        let spec = ParameterSpec::body_object("history_item_ids");
        assert_eq!(
            coerce(&spec, &json!(["a", "b"])).unwrap(),
            json!(["a", "b"])
        );
        assert!(coerce(&spec, &json!("a")).is_err());
    }

    #[test]
    fn test_file_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fake mp3 bytes").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let payload = bind_file("files", &json!(path)).unwrap();
        assert_eq!(payload.field, "files");
        assert_eq!(payload.bytes, b"fake mp3 bytes");
        assert!(!payload.file_name.is_empty());
    }

    #[test]
    fn test_file_from_missing_path() {
        let err = bind_file("files", &json!("/definitely/not/here.mp3")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("files"));
    }

    #[test]
    fn test_file_from_base64() {
        let data = BASE64.encode(b"inline audio");
        let payload = bind_file(
            "file",
            &json!({"data": data, "file_name": "clip.wav"}),
        )
        .unwrap();
        assert_eq!(payload.file_name, "clip.wav");
        assert_eq!(payload.bytes, b"inline audio");

        let err = bind_file("file", &json!({"data": "not-base64!!"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_file_rejects_other_shapes() {
        let err = bind_file("file", &json!(42)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
