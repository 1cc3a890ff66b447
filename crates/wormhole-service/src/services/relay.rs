//! Relay send path
//!
//! Forwards one message through an established link: throttle, resolve the
//! destination, deliver via the transport. Best-effort single hop; nothing
//! is persisted.

use tracing::{info, instrument};

use wormhole_core::traits::RepoResult;
use wormhole_core::value_objects::ChannelId;
use wormhole_core::{LinkMode, WormholeError};

use crate::dto::RelayRequest;

use super::context::ServiceContext;

/// Relay service
pub struct RelayService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RelayService<'a> {
    /// Create a new RelayService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send one message through the wormhole of the request's channel.
    ///
    /// Returns the destination channel on success. The throttle runs before
    /// any lookup, so over-budget invocations cost nothing.
    #[instrument(skip(self, request), fields(sender_channel = %request.sender_channel))]
    pub async fn send(&self, request: RelayRequest) -> RepoResult<ChannelId> {
        self.ctx
            .throttle()
            .check(request.user_id, request.sender_channel)?;

        let remote = self
            .ctx
            .endpoint_repo()
            .find_by_linked_to(request.sender_channel)
            .await?
            .ok_or(WormholeError::NoWormhole)?;

        if remote.linked_to.is_none() {
            return Err(WormholeError::NotLinked);
        }

        match remote.mode {
            LinkMode::Explicit => {}
            LinkMode::Implicit => return Err(WormholeError::Unimplemented("implicit relay")),
        }

        let destination = remote.channel_id;
        if !self.ctx.transport().resolve_channel(destination).await {
            return Err(WormholeError::TargetChannelMissing(destination));
        }

        let guild_name = request.guild_name.clone();
        self.ctx
            .transport()
            .send_message(destination, request.into_message())
            .await?;

        info!(%destination, %guild_name, "Relayed message through wormhole");

        Ok(destination)
    }
}
