//! Repository trait (port) - defines the interface for endpoint persistence
//!
//! The wormhole table is shared mutable state reached from concurrently
//! executing command handlers, so the two operations that touch two rows at
//! once (`link`, `unlink`) are part of the port itself: implementations must
//! make them atomic rather than leaving callers to sequence single-row
//! writes with a race window in between.

use async_trait::async_trait;

use crate::entities::Endpoint;
use crate::error::WormholeError;
use crate::value_objects::{ChannelId, GuildId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, WormholeError>;

#[async_trait]
pub trait EndpointRepository: Send + Sync {
    /// Find the endpoint owned by a guild
    async fn find_by_guild(&self, guild_id: GuildId) -> RepoResult<Option<Endpoint>>;

    /// Find the endpoint bound to a channel
    async fn find_by_channel(&self, channel_id: ChannelId) -> RepoResult<Option<Endpoint>>;

    /// Find the endpoint holding a connection token
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Endpoint>>;

    /// Find the endpoint whose link points at the given channel
    async fn find_by_linked_to(&self, channel_id: ChannelId) -> RepoResult<Option<Endpoint>>;

    /// Check whether a token is already held by any endpoint.
    ///
    /// Must consult current table state; the token generation re-roll loop
    /// depends on this not being a stale snapshot.
    async fn token_exists(&self, token: &str) -> RepoResult<bool>;

    /// Insert a new endpoint row
    async fn create(&self, endpoint: &Endpoint) -> RepoResult<()>;

    /// Delete the endpoint bound to a channel.
    ///
    /// Fails `NotFound` if no row is bound to the channel.
    async fn delete_by_channel(&self, channel_id: ChannelId) -> RepoResult<()>;

    /// Set the lock flag on a guild's endpoint.
    ///
    /// Fails `NoEndpoint` if the guild has no row.
    async fn set_locked(&self, guild_id: GuildId, locked: bool) -> RepoResult<()>;

    /// Establish a link: insert the requesting endpoint and point the token
    /// holder back at it, as ONE atomic transaction.
    ///
    /// Implementations must re-verify the target row under the transaction's
    /// isolation (not trust a read the caller did beforehand): fail
    /// `UnknownToken` if no row holds `target_token`, `TokenLocked` if that
    /// row is locked, otherwise insert `requester` as given and update the
    /// target to `locked = true, linked_to = requester.channel_id`.
    ///
    /// Returns the target row's prior state for notification purposes.
    async fn link(&self, requester: &Endpoint, target_token: &str) -> RepoResult<Endpoint>;

    /// Tear down a link: clear `linked_to`/`locked` on both participating
    /// rows, as ONE atomic transaction.
    ///
    /// The remote side is the row whose `linked_to` equals `channel_id`
    /// (fails `NoActiveLink` if none); the local side is the row owned by
    /// `guild_id` (fails `NoEndpoint` if missing, which indicates the table
    /// has diverged). Returns `(local, remote)` in their cleared states.
    async fn unlink(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RepoResult<(Endpoint, Endpoint)>;

    /// Delete every endpoint row, returning how many were removed
    async fn delete_all(&self) -> RepoResult<u64>;

    /// List all endpoint rows
    async fn all(&self) -> RepoResult<Vec<Endpoint>>;
}
