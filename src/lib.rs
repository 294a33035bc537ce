pub mod config;
pub mod core;

// Re-export commonly used items for convenience
pub use config::GatewayConfig;
pub use core::{
    ErrorKind, ResponseKind, StreamChunk, ToolDispatcher, ToolError, ToolOutput, ToolRegistry,
    ToolResult, ToolStream,
};
