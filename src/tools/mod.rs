//! Tool boundary
//!
//! Publishes the router as a single `search` tool over a small JSON-RPC 2.0
//! surface, served on stdio or over HTTP.

pub mod rpc;
mod server;
pub mod stdio;

pub use rpc::{RpcError, RpcRequest, RpcResponse};
pub use server::{ToolServer, PROTOCOL_VERSION, SEARCH_TOOL, SERVER_NAME};
