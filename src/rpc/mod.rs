//! JSON-RPC transport for the game methods
//!
//! This module decodes `tictactoe.Join`, `tictactoe.Place` and
//! `tictactoe.GetGame` calls, routes them onto the matchmaker and serves them
//! over HTTP alongside the health endpoints.

pub mod handlers;
pub mod messages;
pub mod server;

// Re-export commonly used types
pub use handlers::{RpcDispatcher, RpcService, TicTacToeService};
pub use messages::{RpcError, RpcRequest, RpcResponse, RPC_PATH};
pub use server::{create_router, RpcServer, ServerConfig};
