//! Tool dispatch orchestration
//!
//! # Architecture
//!
//! [`ToolDispatcher`] is the single entry point callers use: look up the tool,
//! bind arguments against its schema, build the wire request, execute it, and
//! hand back the normalized output. Each stage short-circuits on failure, so
//! an invocation that fails validation never touches the transport.
//!
//! The dispatcher owns a shared registry and a boxed [`Transport`], making it
//! cheap to hold one instance for the life of the process and to swap the
//! transport out in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = GatewayConfig::from_env()?;
//! let dispatcher = ToolDispatcher::from_config(&config)?;
//! let output = dispatcher
//!     .invoke("get_voices", &serde_json::Map::new())
//!     .await?;
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::core::binder::bind;
use crate::core::error::{ToolError, ToolResult};
use crate::core::request::{RequestContext, build};
use crate::core::schema::{ToolDescriptor, ToolRegistry};
use crate::core::transport::{HttpTransport, ToolOutput, Transport};

/// Uniform invocation surface over the tool catalog
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    transport: Box<dyn Transport>,
    context: RequestContext,
}

impl ToolDispatcher {
    /// Assemble a dispatcher from parts; used directly by tests
    pub fn new(
        registry: Arc<ToolRegistry>,
        transport: Box<dyn Transport>,
        context: RequestContext,
    ) -> Self {
        Self {
            registry,
            transport,
            context,
        }
    }

    /// Build the production dispatcher: builtin catalog over HTTP
    pub fn from_config(config: &GatewayConfig) -> ToolResult<Self> {
        let registry = ToolRegistry::builtin()
            .map_err(|e| ToolError::internal(format!("tool catalog failed validation: {e}")))?;
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(
            Arc::new(registry),
            Box::new(transport),
            config.request_context(),
        ))
    }

    /// Invoke one tool by name with a JSON argument object
    ///
    /// Stages run in order and the first failure wins; nothing is retried.
    /// A validation or lookup failure returns before any network activity.
    pub async fn invoke(&self, tool: &str, args: &Map<String, Value>) -> ToolResult<ToolOutput> {
        let invocation = Uuid::new_v4();
        debug!(%invocation, tool, "dispatching tool invocation");
        let result = self.dispatch(tool, args).await;
        match &result {
            Ok(output) => {
                debug!(%invocation, tool, stream = output.is_stream(), "tool invocation succeeded")
            }
            Err(e) => {
                warn!(%invocation, tool, kind = e.kind().as_str(), "tool invocation failed: {e}")
            }
        }
        result
    }

    async fn dispatch(&self, tool: &str, args: &Map<String, Value>) -> ToolResult<ToolOutput> {
        let descriptor = self.registry.lookup(tool)?;
        let bound = bind(descriptor, args)?;
        let request = build(descriptor, bound, &self.context)?;
        self.transport.execute(request, descriptor.response).await
    }

    /// The catalog this dispatcher serves
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Iterate the catalog in registration order
    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.registry.tools()
    }

    /// Look up a tool's schema without invoking it
    pub fn describe(&self, tool: &str) -> ToolResult<&ToolDescriptor> {
        self.registry.lookup(tool)
    }
}
