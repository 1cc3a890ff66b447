//! Messaging transport trait (port) - delivery of relay messages
//!
//! The hosting platform owns rendering and delivery; the core only decides
//! what to send and where.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::value_objects::ChannelId;

/// Transport layer errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel {0} not found on the platform")]
    ChannelMissing(ChannelId),

    #[error("message delivery failed: {0}")]
    SendFailed(String),
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// A single message relayed through a wormhole.
///
/// Carries everything the platform needs to render the relay (author
/// attribution, originating guild, optional attachment); the visual format
/// is the transport's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayMessage {
    /// Display name of the sending user
    pub author_name: String,
    /// Full platform tag of the sending user
    pub author_tag: String,
    /// Name of the guild the message originates from
    pub guild_name: String,
    /// Message body
    pub content: String,
    /// URL of an attached file, if any
    pub attachment_url: Option<String>,
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Check whether the platform can currently deliver to the channel
    async fn resolve_channel(&self, channel_id: ChannelId) -> bool;

    /// Deliver a relay message to the channel
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: RelayMessage,
    ) -> TransportResult<()>;
}
