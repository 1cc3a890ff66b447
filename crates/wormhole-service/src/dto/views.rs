//! View structs for registry results
//!
//! Identifiers serialize as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use wormhole_core::value_objects::{ChannelId, UserId};
use wormhole_core::{Endpoint, LinkMode, RelayMessage};

/// Placeholder body for a relay invocation that carried no text
const NO_CONTENT: &str = "*no content sent*";

/// Information about a guild's wormhole, for display
#[derive(Debug, Clone, Serialize)]
pub struct InfoView {
    pub guild_name: String,
    pub channel_id: ChannelId,
    pub open_since: DateTime<Utc>,
    /// Name of the guild currently linked through this channel, if any
    pub linked_guild_name: Option<String>,
    pub mode: LinkMode,
}

/// A guild's connection token and its current state, for display
#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub channel_id: ChannelId,
    pub token: String,
    pub locked: bool,
    /// Name of the guild this endpoint is linked to, if any
    pub linked_guild_name: Option<String>,
}

/// Result of a successful link: the freshly inserted requesting endpoint and
/// the target's state before it was locked, so both channels can be notified.
#[derive(Debug, Clone)]
pub struct LinkEstablished {
    pub endpoint: Endpoint,
    pub target: Endpoint,
}

/// Result of a successful unlink: both endpoints in their cleared states
#[derive(Debug, Clone)]
pub struct UnlinkedPair {
    pub local: Endpoint,
    pub remote: Endpoint,
}

/// Everything the relay needs to forward one message
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub user_id: UserId,
    pub sender_channel: ChannelId,
    pub author_name: String,
    pub author_tag: String,
    pub guild_name: String,
    pub content: String,
    pub attachment_url: Option<String>,
}

impl RelayRequest {
    /// Build the transport message, substituting the placeholder body when
    /// the invocation carried no text.
    pub fn into_message(self) -> RelayMessage {
        let content = if self.content.trim().is_empty() {
            NO_CONTENT.to_string()
        } else {
            self.content
        };
        RelayMessage {
            author_name: self.author_name,
            author_tag: self.author_tag,
            guild_name: self.guild_name,
            content,
            attachment_url: self.attachment_url,
        }
    }
}
