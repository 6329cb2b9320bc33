//! Main application state and service coordination
//!
//! `AppState` is built once at startup and passed explicitly to everything
//! that serves requests. It owns the matchmaker, the RPC dispatcher and the
//! background tasks, and lives until the process exits.

use crate::config::AppConfig;
use crate::matchmaker::Matchmaker;
use crate::rpc::handlers::RpcDispatcher;
use crate::rpc::server::{RpcServer, ServerConfig};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

/// Interval between periodic statistics log lines
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Registry of live games
    matchmaker: Arc<Matchmaker>,

    /// RPC method routing
    dispatcher: Arc<RpcDispatcher>,

    /// Background task handles
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Shutdown broadcast for the HTTP server
    shutdown_tx: broadcast::Sender<()>,

    /// Service status
    is_running: RwLock<bool>,

    started_at: DateTime<Utc>,
}

impl AppState {
    /// Initialize the application with all dependencies
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        info!(
            "Initializing {} - max_games: {}, id lengths: game {} / player {}",
            config.service.name,
            config.matchmaking.max_games,
            config.matchmaking.game_id_length,
            config.matchmaking.player_id_length
        );

        let matchmaker = Arc::new(Matchmaker::from_config(&config.matchmaking));
        let dispatcher = Arc::new(RpcDispatcher::with_matchmaker(matchmaker.clone()));
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            matchmaker,
            dispatcher,
            background_tasks: Mutex::new(Vec::new()),
            shutdown_tx,
            is_running: RwLock::new(false),
            started_at: current_timestamp(),
        })
    }

    /// Start the HTTP server and background tasks
    pub async fn start(self: &Arc<Self>) -> Result<(), ServiceError> {
        info!("Starting {}", self.config.service.name);

        let server_config = ServerConfig {
            host: self.config.service.http_host.clone(),
            port: self.config.service.http_port,
        };
        let server = RpcServer::new(server_config, self.clone());
        let listener = server
            .bind()
            .await
            .map_err(|e| ServiceError::Initialization {
                message: format!("Failed to bind HTTP server: {:#}", e),
            })?;

        *self.is_running.write().await = true;

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let server_task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            };
            if let Err(e) = server.serve(listener, shutdown).await {
                error!("HTTP server failed: {:#}", e);
            } else {
                info!("HTTP server task completed");
            }
        });

        let stats_task = {
            let matchmaker = self.matchmaker.clone();
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(STATS_LOG_INTERVAL);
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {}
                        _ = shutdown_rx.recv() => break,
                    }

                    match matchmaker.get_stats() {
                        Ok(stats) => info!(
                            "Matchmaker stats - active games: {}/{}, created: {}, evicted: {}, finished: {}, players: {}",
                            stats.active_games,
                            stats.max_games,
                            stats.games_created,
                            stats.games_evicted,
                            stats.games_finished,
                            stats.players_joined
                        ),
                        Err(e) => warn!("Failed to read matchmaker stats: {}", e),
                    }
                }

                debug!("Stats task stopped");
            })
        };

        let mut tasks = self.background_tasks.lock().await;
        tasks.push(server_task);
        tasks.push(stats_task);

        info!("✅ {} started on {}", self.config.service.name, self.config.http_addr());
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of {}", self.config.service.name);

        *self.is_running.write().await = false;

        if self.shutdown_tx.send(()).is_err() {
            debug!("HTTP server was not listening for shutdown");
        }

        let tasks: Vec<_> = self.background_tasks.lock().await.drain(..).collect();
        let task_count = tasks.len();
        let deadline = tokio::time::Instant::now() + self.config.shutdown_timeout();

        for (i, mut task) in tasks.into_iter().enumerate() {
            match tokio::time::timeout_at(deadline, &mut task).await {
                Ok(_) => debug!("Background task {}/{} finished", i + 1, task_count),
                Err(_) => {
                    warn!("Background task {}/{} did not stop in time, aborting", i + 1, task_count);
                    task.abort();
                }
            }
        }

        let final_stats =
            self.matchmaker
                .get_stats()
                .map_err(|e| ServiceError::BackgroundTask {
                    message: format!("Failed to get final stats: {}", e),
                })?;

        info!("Final service statistics: {:?}", final_stats);
        info!("✅ {} shutdown completed", self.config.service.name);
        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get the matchmaker
    pub fn matchmaker(&self) -> Arc<Matchmaker> {
        self.matchmaker.clone()
    }

    /// Get the RPC dispatcher
    pub fn dispatcher(&self) -> Arc<RpcDispatcher> {
        self.dispatcher.clone()
    }

    /// When the service state was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Mark the service as running without starting the HTTP server
    #[cfg(test)]
    pub(crate) async fn set_running(&self, running: bool) {
        *self.is_running.write().await = running;
    }
}
