//! Domain errors - every expected failure of a registry operation
//!
//! All of these are recoverable, local conditions the presentation layer maps
//! to user-facing text. Nothing here aborts; the registry surfaces misuse as
//! a named variant and leaves the table untouched.

use thiserror::Error;

use crate::value_objects::{ChannelId, GuildId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum WormholeError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No wormhole has been set up in channel {0}")]
    NotFound(ChannelId),

    #[error("No wormhole is active on guild {0}")]
    NoEndpoint(GuildId),

    #[error("Unknown or incorrect token")]
    UnknownToken,

    #[error("No guild has its wormhole linked to this channel")]
    NoActiveLink,

    #[error("No wormhole connection has been set up for this channel")]
    NoWormhole,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("A wormhole is already open on guild {0}")]
    AlreadyOpen(GuildId),

    #[error("The entered token is currently locked")]
    TokenLocked,

    #[error("This guild's token is already locked")]
    AlreadyLocked,

    #[error("This guild's token is already unlocked")]
    AlreadyUnlocked,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("A link through this wormhole is still active")]
    LinkActive,

    #[error("A wormhole was opened, but no other guild has linked to it yet")]
    NotLinked,

    #[error("Destination channel {0} was not found")]
    TargetChannelMissing(ChannelId),

    #[error("Too many messages sent through the wormhole, slow down")]
    RateLimited,

    #[error("Not implemented: {0}")]
    Unimplemented(&'static str),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<crate::traits::TransportError> for WormholeError {
    fn from(err: crate::traits::TransportError) -> Self {
        match err {
            crate::traits::TransportError::ChannelMissing(channel_id) => {
                Self::TargetChannelMissing(channel_id)
            }
            crate::traits::TransportError::SendFailed(msg) => Self::Transport(msg),
        }
    }
}

impl WormholeError {
    /// Get an error code string for presentation layers
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "UNKNOWN_WORMHOLE",
            Self::NoEndpoint(_) => "NO_ENDPOINT",
            Self::UnknownToken => "UNKNOWN_TOKEN",
            Self::NoActiveLink => "NO_ACTIVE_LINK",
            Self::NoWormhole => "NO_WORMHOLE",
            Self::AlreadyOpen(_) => "ALREADY_OPEN",
            Self::TokenLocked => "TOKEN_LOCKED",
            Self::AlreadyLocked => "ALREADY_LOCKED",
            Self::AlreadyUnlocked => "ALREADY_UNLOCKED",
            Self::LinkActive => "LINK_ACTIVE",
            Self::NotLinked => "NOT_LINKED",
            Self::TargetChannelMissing(_) => "TARGET_CHANNEL_MISSING",
            Self::RateLimited => "RATE_LIMITED",
            Self::Unimplemented(_) => "UNIMPLEMENTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::NoEndpoint(_)
                | Self::UnknownToken
                | Self::NoActiveLink
                | Self::NoWormhole
        )
    }

    /// Check if this is a conflict with existing state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyOpen(_)
                | Self::TokenLocked
                | Self::AlreadyLocked
                | Self::AlreadyUnlocked
                | Self::LinkActive
        )
    }
}
