//! Wormhole registry
//!
//! Owns endpoint lifecycle: opening, token issuance, linking, unlinking,
//! lock state, and the read-only projections. Every operation maps a misuse
//! to a named `WormholeError` variant and leaves the table untouched on
//! failure.

use tracing::{info, instrument, warn};

use wormhole_core::traits::RepoResult;
use wormhole_core::value_objects::{ChannelId, GuildId};
use wormhole_core::{generate_token, Endpoint, WormholeError};

use crate::dto::{InfoView, LinkEstablished, TokenView, UnlinkedPair};

use super::context::ServiceContext;

/// Wormhole registry service
pub struct WormholeRegistry<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WormholeRegistry<'a> {
    /// Create a new WormholeRegistry
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a wormhole for a guild in the given channel.
    ///
    /// One endpoint per guild: fails `AlreadyOpen` if the guild already has
    /// one. Returns the created endpoint; the caller formats the token into
    /// its confirmation message.
    #[instrument(skip(self, guild_name))]
    pub async fn open(
        &self,
        guild_id: GuildId,
        guild_name: &str,
        channel_id: ChannelId,
    ) -> RepoResult<Endpoint> {
        if self.ctx.endpoint_repo().find_by_guild(guild_id).await?.is_some() {
            return Err(WormholeError::AlreadyOpen(guild_id));
        }

        let token = self.generate_unique_token().await?;
        let endpoint = Endpoint::open(guild_id, guild_name.to_string(), channel_id, token);
        self.ctx.endpoint_repo().create(&endpoint).await?;

        info!(%guild_id, %channel_id, "Wormhole opened");

        Ok(endpoint)
    }

    /// Close the wormhole bound to a channel.
    ///
    /// Closing is channel-scoped, not guild-scoped. An endpoint with an
    /// active link must be unlinked first.
    #[instrument(skip(self))]
    pub async fn close(&self, channel_id: ChannelId) -> RepoResult<()> {
        let endpoint = self
            .ctx
            .endpoint_repo()
            .find_by_channel(channel_id)
            .await?
            .ok_or(WormholeError::NotFound(channel_id))?;

        if endpoint.is_linked() {
            return Err(WormholeError::LinkActive);
        }

        self.ctx.endpoint_repo().delete_by_channel(channel_id).await?;

        info!(guild_id = %endpoint.guild_id, %channel_id, "Wormhole closed");

        Ok(())
    }

    /// Link the requesting channel to the endpoint holding `token`.
    ///
    /// Inserts a new endpoint for the requester (born locked, pointed at the
    /// target's channel) and locks the target back at the requester; the
    /// repository applies both writes in one transaction and re-verifies the
    /// target's lock state under it, so the pre-checks here only shape the
    /// error before any work is done.
    #[instrument(skip(self, guild_name, token))]
    pub async fn link(
        &self,
        guild_id: GuildId,
        guild_name: &str,
        channel_id: ChannelId,
        token: &str,
    ) -> RepoResult<LinkEstablished> {
        let target = self
            .ctx
            .endpoint_repo()
            .find_by_token(token)
            .await?
            .ok_or(WormholeError::UnknownToken)?;

        if !target.accepts_links() {
            return Err(WormholeError::TokenLocked);
        }

        let own_token = self.generate_unique_token().await?;
        let requester = Endpoint::linked(
            guild_id,
            guild_name.to_string(),
            channel_id,
            own_token,
            target.channel_id,
        );

        let target = self.ctx.endpoint_repo().link(&requester, token).await?;

        info!(
            %guild_id,
            target_guild = %target.guild_id,
            "Wormhole link established"
        );

        Ok(LinkEstablished {
            endpoint: requester,
            target,
        })
    }

    /// Tear down the link running through the given channel.
    ///
    /// The remote side is found by its `linked_to` reference to this channel;
    /// the local side is the calling guild's own endpoint. Both are restored
    /// to unlocked-and-unlinked atomically.
    #[instrument(skip(self))]
    pub async fn unlink(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RepoResult<UnlinkedPair> {
        let (local, remote) = self.ctx.endpoint_repo().unlink(guild_id, channel_id).await?;

        info!(
            %guild_id,
            remote_guild = %remote.guild_id,
            "Wormhole link torn down"
        );

        Ok(UnlinkedPair { local, remote })
    }

    /// Lock a guild's token against new link attempts
    #[instrument(skip(self))]
    pub async fn lock(&self, guild_id: GuildId) -> RepoResult<()> {
        let endpoint = self
            .ctx
            .endpoint_repo()
            .find_by_guild(guild_id)
            .await?
            .ok_or(WormholeError::NoEndpoint(guild_id))?;

        if endpoint.locked {
            return Err(WormholeError::AlreadyLocked);
        }

        self.ctx.endpoint_repo().set_locked(guild_id, true).await
    }

    /// Unlock a guild's token so other guilds may link to it.
    ///
    /// An endpoint mid-link cannot be unlocked; only `unlink` releases it.
    #[instrument(skip(self))]
    pub async fn unlock(&self, guild_id: GuildId) -> RepoResult<()> {
        let endpoint = self
            .ctx
            .endpoint_repo()
            .find_by_guild(guild_id)
            .await?
            .ok_or(WormholeError::NoEndpoint(guild_id))?;

        if !endpoint.locked {
            return Err(WormholeError::AlreadyUnlocked);
        }

        if endpoint.is_linked() {
            return Err(WormholeError::LinkActive);
        }

        self.ctx.endpoint_repo().set_locked(guild_id, false).await
    }

    /// Resolve the destination channel for a message sent in `sender_channel`.
    ///
    /// The forward target is the channel of the row whose `linked_to` names
    /// the sender's channel. The `NotLinked` arm cannot fire while the link
    /// symmetry invariant holds; it guards against a diverged table.
    #[instrument(skip(self))]
    pub async fn resolve_forward_target(
        &self,
        sender_channel: ChannelId,
    ) -> RepoResult<ChannelId> {
        let remote = self
            .ctx
            .endpoint_repo()
            .find_by_linked_to(sender_channel)
            .await?
            .ok_or(WormholeError::NoWormhole)?;

        if remote.linked_to.is_none() {
            return Err(WormholeError::NotLinked);
        }

        let destination = remote.channel_id;
        if !self.ctx.transport().resolve_channel(destination).await {
            return Err(WormholeError::TargetChannelMissing(destination));
        }

        Ok(destination)
    }

    /// Display information about a guild's wormhole
    #[instrument(skip(self))]
    pub async fn info(&self, guild_id: GuildId, channel_id: ChannelId) -> RepoResult<InfoView> {
        let endpoint = self
            .ctx
            .endpoint_repo()
            .find_by_guild(guild_id)
            .await?
            .ok_or(WormholeError::NoEndpoint(guild_id))?;

        let partner = self.ctx.endpoint_repo().find_by_linked_to(channel_id).await?;

        Ok(InfoView {
            guild_name: endpoint.guild_name,
            channel_id: endpoint.channel_id,
            open_since: endpoint.open_since,
            linked_guild_name: partner.map(|p| p.guild_name),
            mode: endpoint.mode,
        })
    }

    /// Display a guild's token and its lock/link state
    #[instrument(skip(self))]
    pub async fn token(&self, guild_id: GuildId) -> RepoResult<TokenView> {
        let endpoint = self
            .ctx
            .endpoint_repo()
            .find_by_guild(guild_id)
            .await?
            .ok_or(WormholeError::NoEndpoint(guild_id))?;

        let linked_guild_name = match endpoint.linked_to {
            Some(channel) => self
                .ctx
                .endpoint_repo()
                .find_by_channel(channel)
                .await?
                .map(|p| p.guild_name),
            None => None,
        };

        Ok(TokenView {
            channel_id: endpoint.channel_id,
            token: endpoint.token,
            locked: endpoint.locked,
            linked_guild_name,
        })
    }

    /// Remove every endpoint record. Authorization is the caller's concern.
    #[instrument(skip(self))]
    pub async fn drop_all(&self) -> RepoResult<u64> {
        let removed = self.ctx.endpoint_repo().delete_all().await?;

        warn!(removed, "Deleted all entries from the wormhole table");

        Ok(removed)
    }

    /// Generate a token that no stored endpoint currently holds.
    ///
    /// Re-rolls against current table state until the draw is unique. At 62
    /// symbols over 10 positions a collision is astronomically unlikely, so
    /// the loop terminates in one iteration in practice; the UNIQUE
    /// constraint on the token column backstops the residual race between
    /// check and insert.
    async fn generate_unique_token(&self) -> RepoResult<String> {
        loop {
            let token = generate_token();
            if !self.ctx.endpoint_repo().token_exists(&token).await? {
                return Ok(token);
            }
        }
    }
}
