//! Tool contracts and the schema registry
//!
//! A [`ToolDescriptor`] is the declarative contract for one upstream
//! operation: HTTP method, URL template with named `{placeholder}` segments,
//! ordered parameter specs, and the response kind. Descriptors are plain
//! data; all behavior lives in the binder, builder, and transport stages so
//! it is written (and tested) once instead of once per endpoint.
//!
//! The [`ToolRegistry`] validates the whole table at construction and is
//! read-only afterwards. Malformed templates and duplicate names are fatal
//! startup errors, never runtime ones.

use std::collections::HashMap;
use std::fmt;

use http::Method;
use serde_json::Value;
use tracing::info;

use crate::core::error::{RegistryError, ToolError, ToolResult};

// =============================================================================
// Contract types
// =============================================================================

/// How a tool's response body is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Buffered body, decoded as JSON
    Json,
    /// Buffered body, passed through as raw bytes
    Binary,
    /// Lazy sequence of newline-delimited JSON events
    StreamJson,
    /// Lazy sequence of raw byte chunks (audio)
    StreamBinary,
}

impl ResponseKind {
    /// Whether the body is consumed incrementally rather than buffered
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::StreamJson | Self::StreamBinary)
    }

    /// Whether the tool expects a JSON-shaped payload (buffered or streamed)
    pub fn expects_json(&self) -> bool {
        matches!(self, Self::Json | Self::StreamJson)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "binary",
            Self::StreamJson => "stream-json",
            Self::StreamBinary => "stream-binary",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a URL template placeholder
    Path,
    /// Appended to the query string when bound
    Query,
    /// JSON body field, or form text field for multipart tools
    Body,
    /// Multipart file part carrying raw bytes
    File,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type a bound argument is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    /// String restricted to a fixed set of allowed values
    Enum(&'static [&'static str]),
    /// Raw file content (path reference or inline base64)
    File,
    /// Structured JSON value (object or array) passed through unchanged
    Object,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Boolean => f.write_str("boolean"),
            Self::Enum(allowed) => write!(f, "enum({})", allowed.join("|")),
            Self::File => f.write_str("file"),
            Self::Object => f.write_str("object"),
        }
    }
}

/// Contract for a single tool parameter
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub location: ParamLocation,
    pub required: bool,
    /// Substituted by the binder when the argument is absent
    pub default: Option<Value>,
}

impl ParameterSpec {
    /// Create a parameter spec, optional by default
    pub fn new(name: &'static str, kind: ParamKind, location: ParamLocation) -> Self {
        Self {
            name,
            kind,
            location,
            required: false,
            default: None,
        }
    }

    /// Required string path parameter (the only shape path params take here)
    pub fn path(name: &'static str) -> Self {
        Self::new(name, ParamKind::String, ParamLocation::Path).required()
    }

    pub fn query_string(name: &'static str) -> Self {
        Self::new(name, ParamKind::String, ParamLocation::Query)
    }

    pub fn query_integer(name: &'static str) -> Self {
        Self::new(name, ParamKind::Integer, ParamLocation::Query)
    }

    pub fn query_boolean(name: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean, ParamLocation::Query)
    }

    pub fn query_enum(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(name, ParamKind::Enum(allowed), ParamLocation::Query)
    }

    pub fn body_string(name: &'static str) -> Self {
        Self::new(name, ParamKind::String, ParamLocation::Body)
    }

    pub fn body_integer(name: &'static str) -> Self {
        Self::new(name, ParamKind::Integer, ParamLocation::Body)
    }

    pub fn body_boolean(name: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean, ParamLocation::Body)
    }

    pub fn body_enum(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(name, ParamKind::Enum(allowed), ParamLocation::Body)
    }

    pub fn body_object(name: &'static str) -> Self {
        Self::new(name, ParamKind::Object, ParamLocation::Body)
    }

    /// Multipart file parameter
    pub fn file(name: &'static str) -> Self {
        Self::new(name, ParamKind::File, ParamLocation::File)
    }

    /// Mark this parameter required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value substituted when the argument is absent
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Declarative contract for one tool
///
/// Immutable once the registry is constructed. The parameter order is the
/// order query pairs are emitted in, which keeps built requests
/// deterministic.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub method: Method,
    /// URL path template, e.g. `/v1/voices/{voice_id}`
    pub path: &'static str,
    pub params: Vec<ParameterSpec>,
    pub response: ResponseKind,
}

impl ToolDescriptor {
    pub fn new(
        name: &'static str,
        method: Method,
        path: &'static str,
        params: Vec<ParameterSpec>,
        response: ResponseKind,
    ) -> Self {
        Self {
            name,
            method,
            path,
            params,
            response,
        }
    }

    /// Look up a parameter spec by name
    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether any parameter is file-located, forcing a multipart body
    pub fn has_file_params(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.location == ParamLocation::File)
    }

    /// Extract the named `{placeholder}` segments from the URL template
    ///
    /// Returns the placeholder names in template order, or a reason string
    /// when the template is unbalanced or contains empty braces.
    pub fn placeholders(&self) -> Result<Vec<&'static str>, String> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| format!("unclosed '{{' in '{}'", self.path))?;
            let name = &after[..close];
            if name.is_empty() {
                return Err(format!("empty placeholder in '{}'", self.path));
            }
            if name.contains('{') {
                return Err(format!("nested '{{' in '{}'", self.path));
            }
            names.push(name);
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(format!("unmatched '}}' in '{}'", self.path));
        }
        Ok(names)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Read-only table of tool contracts, validated at construction
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Build a registry, rejecting malformed tables
    ///
    /// Rejected shapes: duplicate tool names, duplicate parameter names
    /// within a tool, template placeholders with no path parameter, path
    /// parameters with no placeholder, and optional or defaulted path
    /// parameters.
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            Self::validate(tool)?;
            if index.insert(tool.name, position).is_some() {
                return Err(RegistryError::DuplicateTool(tool.name.to_string()));
            }
        }
        info!(tools = tools.len(), "schema registry constructed");
        Ok(Self { tools, index })
    }

    /// Build the registry from the builtin catalog
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(crate::core::catalog::builtin_tools())
    }

    /// Find a tool contract by name
    pub fn lookup(&self, name: &str) -> ToolResult<&ToolDescriptor> {
        self.index
            .get(name)
            .map(|&position| &self.tools[position])
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Iterate tools in registration order
    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn validate(tool: &ToolDescriptor) -> Result<(), RegistryError> {
        let mut seen = HashMap::new();
        for param in &tool.params {
            if seen.insert(param.name, param.location).is_some() {
                return Err(RegistryError::DuplicateParameter {
                    tool: tool.name.to_string(),
                    parameter: param.name.to_string(),
                });
            }
            if param.location == ParamLocation::Path && (!param.required || param.default.is_some())
            {
                return Err(RegistryError::OptionalPathParameter {
                    tool: tool.name.to_string(),
                    parameter: param.name.to_string(),
                });
            }
        }

        let placeholders = tool
            .placeholders()
            .map_err(|reason| RegistryError::MalformedTemplate {
                tool: tool.name.to_string(),
                reason,
            })?;
        for placeholder in &placeholders {
            match seen.get(placeholder) {
                Some(ParamLocation::Path) => {}
                _ => {
                    return Err(RegistryError::UnboundPlaceholder {
                        tool: tool.name.to_string(),
                        placeholder: placeholder.to_string(),
                    });
                }
            }
        }
        for param in &tool.params {
            if param.location == ParamLocation::Path && !placeholders.contains(&param.name) {
                return Err(RegistryError::OrphanPathParameter {
                    tool: tool.name.to_string(),
                    parameter: param.name.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_tool() -> ToolDescriptor {
        ToolDescriptor::new(
            "get_voice",
            Method::GET,
            "/v1/voices/{voice_id}",
            vec![
                ParameterSpec::path("voice_id"),
                ParameterSpec::query_boolean("with_settings"),
            ],
            ResponseKind::Json,
        )
    }

    #[test]
    fn test_lookup_registered_tool() {
        let registry = ToolRegistry::new(vec![voice_tool()]).unwrap();
        let tool = registry.lookup("get_voice").unwrap();
        assert_eq!(tool.method, Method::GET);
        assert_eq!(tool.response, ResponseKind::Json);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown_tool_is_not_found() {
        let registry = ToolRegistry::new(vec![voice_tool()]).unwrap();
        let err = registry.lookup("get_vices").unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_tool_rejected() {
        let err = ToolRegistry::new(vec![voice_tool(), voice_tool()]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("get_voice".to_string()));
    }

    #[test]
    fn test_placeholder_without_spec_rejected() {
        let tool = ToolDescriptor::new(
            "get_voice",
            Method::GET,
            "/v1/voices/{voice_id}",
            vec![],
            ResponseKind::Json,
        );
        let err = ToolRegistry::new(vec![tool]).unwrap_err();
        assert!(matches!(err, RegistryError::UnboundPlaceholder { .. }));
    }

    #[test]
    fn test_path_spec_without_placeholder_rejected() {
        let tool = ToolDescriptor::new(
            "get_voices",
            Method::GET,
            "/v1/voices",
            vec![ParameterSpec::path("voice_id")],
            ResponseKind::Json,
        );
        let err = ToolRegistry::new(vec![tool]).unwrap_err();
        assert!(matches!(err, RegistryError::OrphanPathParameter { .. }));
    }

    #[test]
    fn test_optional_path_spec_rejected() {
        let mut spec = ParameterSpec::path("voice_id");
        spec.required = false;
        let tool = ToolDescriptor::new(
            "get_voice",
            Method::GET,
            "/v1/voices/{voice_id}",
            vec![spec],
            ResponseKind::Json,
        );
        let err = ToolRegistry::new(vec![tool]).unwrap_err();
        assert!(matches!(err, RegistryError::OptionalPathParameter { .. }));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let tool = ToolDescriptor::new(
            "get_voices",
            Method::GET,
            "/v1/voices",
            vec![
                ParameterSpec::query_integer("page_size"),
                ParameterSpec::query_string("page_size"),
            ],
            ResponseKind::Json,
        );
        let err = ToolRegistry::new(vec![tool]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_malformed_templates_rejected() {
        for path in ["/v1/{voice_id", "/v1/{}/x", "/v1/voice}/x"] {
            let tool = ToolDescriptor::new("bad", Method::GET, path, vec![], ResponseKind::Json);
            let err = ToolRegistry::new(vec![tool]).unwrap_err();
            assert!(
                matches!(err, RegistryError::MalformedTemplate { .. }),
                "path {path} should be malformed"
            );
        }
    }

    #[test]
    fn test_placeholder_extraction() {
        let tool = ToolDescriptor::new(
            "get_transcript_for_dub",
            Method::GET,
            "/v1/dubbing/{dubbing_id}/transcript/{language_code}",
            vec![],
            ResponseKind::Json,
        );
        assert_eq!(
            tool.placeholders().unwrap(),
            vec!["dubbing_id", "language_code"]
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ParamKind::Integer.to_string(), "integer");
        assert_eq!(
            ParamKind::Enum(&["male", "female"]).to_string(),
            "enum(male|female)"
        );
        assert_eq!(ResponseKind::StreamBinary.to_string(), "stream-binary");
    }
}
