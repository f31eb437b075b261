//! Transport boundary to the analysis server.
//!
//! The transport owns socket setup and wire framing. It speaks in strings
//! and string errors, the same shape as a desktop IPC command, and the RPC
//! client maps those failures into [`crate::PqaError`] variants.

use async_trait::async_trait;

/// Message-queue channel to the external analysis process.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens the channel.
    async fn connect(&self) -> Result<(), String>;

    /// Sends `{method, params}` and waits for the raw reply.
    ///
    /// `params` is already JSON-encoded.
    async fn send_request(&self, method: &str, params: &str) -> Result<String, String>;

    /// Closes the channel.
    async fn disconnect(&self) -> Result<(), String>;
}
