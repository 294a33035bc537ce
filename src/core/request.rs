//! Transport-level request construction
//!
//! Pure translation of a validated [`BoundRequest`] into a
//! [`TransportRequest`]: path placeholders substituted (and percent-encoded)
//! by name, query pairs appended only when bound, the auth header attached
//! from the injected credential, and the body shaped as JSON or multipart.
//!
//! Everything here is a plain data transformation. Identical inputs yield
//! identical requests, which is what makes the builder testable without a
//! network; the only send-time variance is the multipart boundary the HTTP
//! client generates.

use http::Method;
use serde_json::Value;
use url::Url;

use crate::core::binder::{BoundRequest, FilePayload};
use crate::core::error::{ToolError, ToolResult};
use crate::core::schema::ToolDescriptor;

/// Header carrying the upstream credential
pub const AUTH_HEADER: &str = "xi-api-key";

/// Resolved call-site configuration the builder consumes
///
/// Both values are injected at construction; nothing here is read from
/// ambient process state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub base_url: String,
    pub api_key: String,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Request body shape
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Single JSON object of body-located values
    Json(Value),
    /// Multipart form: text fields plus raw file parts
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<FilePayload>,
    },
}

/// Fully constructed request, ready for the transport stage
///
/// A comparable value rather than a client-library object so builder purity
/// can be asserted directly in tests. Content-Type is implied by the body
/// shape and set by the transport at send time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

/// Build a transport request from a tool contract and bound arguments
pub fn build(
    descriptor: &ToolDescriptor,
    bound: BoundRequest,
    context: &RequestContext,
) -> ToolResult<TransportRequest> {
    let url = build_url(descriptor, &bound, context)?;

    let mut headers = vec![(AUTH_HEADER.to_string(), context.api_key.clone())];
    if descriptor.response.expects_json() {
        headers.push(("accept".to_string(), "application/json".to_string()));
    }

    let body = if descriptor.has_file_params() {
        RequestBody::Multipart {
            fields: form_fields(&bound),
            files: bound.files,
        }
    } else if bound.body.is_empty() {
        RequestBody::Empty
    } else {
        RequestBody::Json(Value::Object(bound.body))
    };

    Ok(TransportRequest {
        method: descriptor.method.clone(),
        url,
        headers,
        body,
    })
}

/// Join the base URL with the substituted template and bound query pairs
fn build_url(
    descriptor: &ToolDescriptor,
    bound: &BoundRequest,
    context: &RequestContext,
) -> ToolResult<Url> {
    let mut url = Url::parse(&context.base_url)
        .map_err(|e| ToolError::internal(format!("invalid base URL '{}': {e}", context.base_url)))?;

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ToolError::internal(format!("base URL '{}' cannot carry a path", context.base_url))
        })?;
        segments.pop_if_empty();
        for segment in descriptor.path.split('/').filter(|s| !s.is_empty()) {
            // push() percent-encodes, so substituted values cannot break the path
            segments.push(&fill_segment(descriptor, segment, bound)?);
        }
    }

    if !bound.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &bound.query {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// Substitute every `{placeholder}` occurrence within one template segment
///
/// A placeholder without a bound value means the registry and binder
/// disagree about the contract; registry validation makes that unreachable
/// for well-formed tables, so it surfaces as an internal error.
fn fill_segment(
    descriptor: &ToolDescriptor,
    segment: &str,
    bound: &BoundRequest,
) -> ToolResult<String> {
    if !segment.contains('{') {
        return Ok(segment.to_string());
    }
    let mut filled = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            ToolError::internal(format!(
                "tool '{}' has an unbalanced URL template",
                descriptor.name
            ))
        })?;
        let name = &after[..close];
        let value = bound.path.get(name).ok_or_else(|| {
            ToolError::internal(format!(
                "tool '{}' has no bound value for path placeholder '{name}'",
                descriptor.name
            ))
        })?;
        filled.push_str(value);
        rest = &after[close + 1..];
    }
    filled.push_str(rest);
    Ok(filled)
}

/// Flatten body values into multipart text fields
///
/// Scalars are rendered plainly; structured values are serialized to
/// compact JSON, which is how the upstream expects labels and locator
/// lists inside form data.
fn form_fields(bound: &BoundRequest) -> Vec<(String, String)> {
    bound
        .body
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            (name.clone(), rendered)
        })
        .collect()
}
