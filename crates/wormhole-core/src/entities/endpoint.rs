//! Endpoint entity - one guild's side of a wormhole
//!
//! An endpoint binds a guild's channel to a connection token. Two endpoints
//! form a link when one consumes the other's token; the link is symmetric
//! (each side's `linked_to` names the other's channel) and exclusive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChannelId, GuildId};

/// How messages travel through an established link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum LinkMode {
    /// Relay every message posted in the wormhole channel (not implemented)
    Implicit = 1,
    /// Relay only messages explicitly submitted through the send command
    #[default]
    Explicit = 2,
}

impl LinkMode {
    /// Get the numeric value as stored in the database
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for LinkMode {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Implicit,
            _ => Self::Explicit, // Default for 2 and unknown values
        }
    }
}

impl From<LinkMode> for i16 {
    fn from(mode: LinkMode) -> Self {
        mode as i16
    }
}

/// Endpoint entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub guild_id: GuildId,
    pub guild_name: String,
    pub channel_id: ChannelId,
    pub token: String,
    pub locked: bool,
    pub linked_to: Option<ChannelId>,
    pub open_since: DateTime<Utc>,
    pub mode: LinkMode,
}

impl Endpoint {
    /// Create a freshly opened endpoint: unlocked, unlinked, ready to accept
    /// a link through its token.
    pub fn open(guild_id: GuildId, guild_name: String, channel_id: ChannelId, token: String) -> Self {
        Self {
            guild_id,
            guild_name,
            channel_id,
            token,
            locked: false,
            linked_to: None,
            open_since: Utc::now(),
            mode: LinkMode::Explicit,
        }
    }

    /// Create the endpoint inserted on the requesting side of a link.
    ///
    /// The row is born locked and pointed at the target channel; its own
    /// token is never handed out while the link stands.
    pub fn linked(
        guild_id: GuildId,
        guild_name: String,
        channel_id: ChannelId,
        token: String,
        target_channel: ChannelId,
    ) -> Self {
        Self {
            guild_id,
            guild_name,
            channel_id,
            token,
            locked: true,
            linked_to: Some(target_channel),
            open_since: Utc::now(),
            mode: LinkMode::Explicit,
        }
    }

    /// Check if this endpoint currently participates in a link
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked_to.is_some()
    }

    /// Check if another guild may consume this endpoint's token
    #[inline]
    pub fn accepts_links(&self) -> bool {
        !self.locked
    }

    /// Clear link state, returning the endpoint to open-and-unlocked
    pub fn clear_link(&mut self) {
        self.linked_to = None;
        self.locked = false;
    }
}

/// Length of a connection token
pub const TOKEN_LEN: usize = 10;

/// Generate a connection token: `TOKEN_LEN` characters drawn uniformly from
/// the alphanumeric alphabet using the operating system's CSPRNG.
///
/// Uniqueness against the stored token set is the caller's responsibility;
/// this function only produces the raw draw.
pub fn generate_token() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rngs::OsRng;
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
