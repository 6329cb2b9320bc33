//! JSON-RPC message definitions and serialization
//!
//! Requests arrive as `{"jsonrpc":"2.0","id":..,"method":"tictactoe.Join","params":[{..}]}`.
//! Argument and reply fields keep their PascalCase wire names.

use crate::game::board::{Board, Piece};
use crate::types::{GameState, JoinOutcome};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP path serving JSON-RPC calls
pub const RPC_PATH: &str = "/rpc/dowithgo";

/// Service namespace for the game methods
pub const TICTACTOE_SERVICE: &str = "tictactoe";

/// Method names, relative to the service namespace
pub const JOIN_METHOD: &str = "Join";
pub const PLACE_METHOD: &str = "Place";
pub const GET_GAME_METHOD: &str = "GetGame";

/// Errors produced while decoding or dispatching a call
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("rpc: can't find service {method}")]
    MethodNotFound { method: String },

    #[error("rpc: invalid params: {reason}")]
    InvalidParams { reason: String },

    #[error(transparent)]
    Game(#[from] crate::error::MatchmakingError),
}

/// Incoming JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    /// Build a request carrying a single argument object
    pub fn new<T: Serialize>(method: &str, args: &T, id: Value) -> serde_json::Result<Self> {
        Ok(Self {
            jsonrpc: Some("2.0".to_string()),
            id,
            method: method.to_string(),
            params: Value::Array(vec![serde_json::to_value(args)?]),
        })
    }
}

/// Outgoing JSON-RPC response. Exactly one of `result` / `error` is non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<String>,
    pub id: Value,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, error: &RpcError) -> Self {
        Self {
            result: None,
            error: Some(error.to_string()),
            id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Decode the single argument object of a call
///
/// Accepts the positional form `[{..}]`, a bare object, or no params at all.
pub fn decode_params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let arg = match params {
        Value::Null => Value::Object(Default::default()),
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        Value::Array(items) => {
            return Err(RpcError::InvalidParams {
                reason: format!("expected 1 argument, got {}", items.len()),
            })
        }
        other => other,
    };

    serde_json::from_value(arg).map_err(|e| RpcError::InvalidParams {
        reason: e.to_string(),
    })
}

/// Arguments to `tictactoe.Join`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinArgs {}

/// Reply to `tictactoe.Join`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinReply {
    #[serde(rename = "GameID")]
    pub game_id: String,
    #[serde(rename = "Board")]
    pub board: Board,
    #[serde(rename = "PlayerID")]
    pub player_id: String,
    #[serde(rename = "Piece")]
    pub piece: Piece,
}

impl From<JoinOutcome> for JoinReply {
    fn from(outcome: JoinOutcome) -> Self {
        Self {
            game_id: outcome.game_id,
            board: outcome.state.board,
            player_id: outcome.player_id,
            piece: outcome.piece,
        }
    }
}

/// Arguments to `tictactoe.Place`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceArgs {
    #[serde(rename = "GameID")]
    pub game_id: String,
    #[serde(rename = "PlayerID")]
    pub player_id: String,
    /// `[row, col]`
    #[serde(rename = "Position")]
    pub position: [i64; 2],
}

/// Arguments to `tictactoe.GetGame`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetGameArgs {
    #[serde(rename = "GameID")]
    pub game_id: String,
}

/// Reply to `tictactoe.Place` and `tictactoe.GetGame`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReply {
    #[serde(rename = "Board")]
    pub board: Board,
    /// Winning player's ID, empty while there is none
    #[serde(rename = "Winner")]
    pub winner: String,
    #[serde(rename = "Over")]
    pub over: bool,
}

impl From<GameState> for GameReply {
    fn from(state: GameState) -> Self {
        Self {
            board: state.board,
            winner: state.winner.unwrap_or_default(),
            over: state.over,
        }
    }
}
