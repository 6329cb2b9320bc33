//! JSON-RPC handlers routing calls onto the matchmaker
//!
//! Methods are addressed as `<service>.<Method>`. Each registered service
//! owns one namespace; the dispatcher splits the method name and forwards the
//! raw params to the owning service.

use crate::matchmaker::Matchmaker;
use crate::rpc::messages::{
    decode_params, GameReply, GetGameArgs, JoinArgs, JoinReply, PlaceArgs, RpcError, RpcRequest,
    RpcResponse, GET_GAME_METHOD, JOIN_METHOD, PLACE_METHOD, TICTACTOE_SERVICE,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// A named group of remotely callable methods
pub trait RpcService: Send + Sync {
    /// Namespace the service is registered under
    fn name(&self) -> &str;

    /// Invoke `method` (without namespace) with raw params
    fn call(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}

fn to_result<T: Serialize>(reply: T) -> Result<Value, RpcError> {
    serde_json::to_value(reply).map_err(|e| {
        RpcError::Game(crate::error::MatchmakingError::Internal {
            message: format!("Failed to serialize reply: {}", e),
        })
    })
}

/// The `tictactoe` service: Join, Place and GetGame
pub struct TicTacToeService {
    matchmaker: Arc<Matchmaker>,
}

impl TicTacToeService {
    pub fn new(matchmaker: Arc<Matchmaker>) -> Self {
        Self { matchmaker }
    }

    fn join(&self, _args: JoinArgs) -> Result<JoinReply, RpcError> {
        Ok(self.matchmaker.join()?.into())
    }

    fn place(&self, args: PlaceArgs) -> Result<GameReply, RpcError> {
        let [row, col] = args.position;
        Ok(self
            .matchmaker
            .place(&args.game_id, &args.player_id, row, col)?
            .into())
    }

    fn get_game(&self, args: GetGameArgs) -> Result<GameReply, RpcError> {
        Ok(self.matchmaker.get_game(&args.game_id)?.into())
    }
}

impl RpcService for TicTacToeService {
    fn name(&self) -> &str {
        TICTACTOE_SERVICE
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            JOIN_METHOD => to_result(self.join(decode_params(params)?)?),
            PLACE_METHOD => to_result(self.place(decode_params(params)?)?),
            GET_GAME_METHOD => to_result(self.get_game(decode_params(params)?)?),
            other => Err(RpcError::MethodNotFound {
                method: format!("{}.{}", TICTACTOE_SERVICE, other),
            }),
        }
    }
}

/// Routes requests to registered services by namespace
#[derive(Default)]
pub struct RpcDispatcher {
    services: HashMap<String, Arc<dyn RpcService>>,
}

impl RpcDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the game service registered
    pub fn with_matchmaker(matchmaker: Arc<Matchmaker>) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(Arc::new(TicTacToeService::new(matchmaker)));
        dispatcher
    }

    /// Register a service under its own name, replacing any previous one
    pub fn register(&mut self, service: Arc<dyn RpcService>) {
        self.services.insert(service.name().to_string(), service);
    }

    /// Handle one request, always producing a response
    pub fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let start_time = Instant::now();
        let RpcRequest {
            id, method, params, ..
        } = request;

        let result = method
            .split_once('.')
            .and_then(|(service, name)| Some((self.services.get(service)?, name)))
            .ok_or_else(|| RpcError::MethodNotFound {
                method: method.clone(),
            })
            .and_then(|(service, name)| service.call(name, params));

        let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        match result {
            Ok(value) => {
                debug!("RPC {} succeeded in {:.2}ms", method, elapsed_ms);
                RpcResponse::success(id, value)
            }
            Err(e) => {
                match &e {
                    RpcError::Game(inner) if !inner.is_not_found() && !inner.is_precondition() => {
                        error!("RPC {} failed in {:.2}ms: {}", method, elapsed_ms, e)
                    }
                    _ => warn!("RPC {} rejected in {:.2}ms: {}", method, elapsed_ms, e),
                }
                RpcResponse::failure(id, &e)
            }
        }
    }
}
