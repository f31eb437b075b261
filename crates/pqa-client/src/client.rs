//! RPC client for the analysis server.

use crate::method;
use crate::replies::check_reply;
use pqa_core::error::{PqaError, Result};
use pqa_core::transport::Transport;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Request/response client over a [`Transport`].
///
/// Construct one per application and share it (e.g. behind an `Arc`); the
/// connection flag lives on the instance. Calls are expected one at a time:
/// there is no request queue, and two overlapping calls race on the flag and
/// on the transport.
///
/// Every convenience method funnels into [`RpcClient::send_request`], which
/// connects on first use.
///
/// # Example
///
/// ```ignore
/// let client = RpcClient::new(transport);
/// client.initialize("/papers", settings.to_json_map()).await?;
/// let answer = client.ask("What does the corpus say about CRISPR?").await?;
/// client.close().await?;
/// ```
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    connected: AtomicBool,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            connected: AtomicBool::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Connects if not already connected.
    ///
    /// The flag is only set once the transport reports success; a failed
    /// attempt leaves the client unconnected and returns
    /// [`PqaError::Connection`]. No retry.
    pub async fn connect(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        match self.transport.connect().await {
            Ok(()) => {
                self.connected.store(true, Ordering::SeqCst);
                tracing::info!("[RpcClient] Connected to analysis server");
                Ok(())
            }
            Err(e) => {
                tracing::error!("[RpcClient] Failed to connect to analysis server: {}", e);
                Err(PqaError::connection(e))
            }
        }
    }

    /// Invokes `method` with `params` and returns the decoded JSON reply.
    ///
    /// # Errors
    ///
    /// - [`PqaError::Connection`] if the implicit connect fails
    /// - [`PqaError::Transport`] if the transport call fails
    /// - [`PqaError::Decode`] if the reply is not valid JSON
    pub async fn send_request(&self, method: &str, params: Map<String, Value>) -> Result<Value> {
        if !self.is_connected() {
            self.connect().await?;
        }

        let params_json = serde_json::to_string(&params)?;
        tracing::debug!("[RpcClient] -> {} {}", method, params_json);

        let raw = match self.transport.send_request(method, &params_json).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("[RpcClient] Error sending {} request: {}", method, e);
                return Err(PqaError::transport(method, e));
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                tracing::debug!("[RpcClient] <- {} ({} bytes)", method, raw.len());
                Ok(value)
            }
            Err(e) => {
                tracing::error!("[RpcClient] Invalid JSON in {} response: {}", method, e);
                Err(PqaError::decode(method, e.to_string()))
            }
        }
    }

    /// Sends a request and decodes the reply into `T`.
    ///
    /// Replies carrying `"status": "error"` become [`PqaError::Remote`]; a
    /// reply that doesn't fit `T` is a [`PqaError::Decode`].
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Map<String, Value>) -> Result<T> {
        let value = self.send_request(method, params).await?;
        let value = check_reply(method, value)?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!("[RpcClient] Unexpected {} reply shape: {}", method, e);
            PqaError::decode(method, e.to_string())
        })
    }

    /// Initializes the server for `paper_dir`.
    ///
    /// Option keys are merged after `paper_dir`, so an option with that name
    /// overrides the argument.
    pub async fn initialize(&self, paper_dir: &str, options: impl Into<Map<String, Value>>) -> Result<Value> {
        let mut params = Map::new();
        params.insert(method::PAPER_DIR_PARAM.to_string(), Value::from(paper_dir));
        params.extend(options.into());
        self.send_request(method::INITIALIZE, params).await
    }

    pub async fn ask(&self, question: &str) -> Result<Value> {
        let mut params = Map::new();
        params.insert(method::QUESTION_PARAM.to_string(), Value::from(question));
        self.send_request(method::ASK, params).await
    }

    /// Pushes a settings mapping to the server as-is.
    pub async fn update_settings(&self, settings: impl Into<Map<String, Value>>) -> Result<Value> {
        self.send_request(method::UPDATE_SETTINGS, settings.into()).await
    }

    pub async fn get_preset_names(&self) -> Result<Value> {
        self.send_request(method::GET_PRESET_NAMES, Map::new()).await
    }

    pub async fn get_status(&self) -> Result<Value> {
        self.send_request(method::GET_STATUS, Map::new()).await
    }

    /// Disconnects if connected.
    ///
    /// Once a disconnect has been attempted the client counts as
    /// disconnected, whether or not the transport reported success; a failure
    /// is still returned as [`PqaError::Connection`]. The next request
    /// reconnects.
    pub async fn close(&self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        let outcome = self.transport.disconnect().await;
        self.connected.store(false, Ordering::SeqCst);

        match outcome {
            Ok(()) => {
                tracing::info!("[RpcClient] Disconnected from analysis server");
                Ok(())
            }
            Err(e) => {
                tracing::error!("[RpcClient] Error disconnecting from server: {}", e);
                Err(PqaError::connection(e))
            }
        }
    }
}
