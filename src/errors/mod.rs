mod mcp_error;
mod startup_error;
mod tool_error;

pub use mcp_error::{ErrorCode, McpError};
pub use startup_error::StartupError;
pub use tool_error::{ToolError, ToolErrorKind};
