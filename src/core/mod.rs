pub mod binder;
pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod request;
pub mod schema;
pub mod transport;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, RegistryError, ToolError, ToolResult};

pub use schema::{
    ParamKind, ParamLocation, ParameterSpec, ResponseKind, ToolDescriptor, ToolRegistry,
};

pub use binder::{BoundRequest, FilePayload, bind};

pub use request::{AUTH_HEADER, RequestBody, RequestContext, TransportRequest, build};

pub use transport::{HttpTransport, StreamChunk, ToolOutput, ToolStream, Transport};

pub use dispatcher::ToolDispatcher;
