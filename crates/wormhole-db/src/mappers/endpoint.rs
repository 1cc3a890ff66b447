//! Endpoint entity <-> model mapper

use wormhole_core::value_objects::{ChannelId, GuildId};
use wormhole_core::{Endpoint, LinkMode};

use crate::models::EndpointModel;

/// Convert EndpointModel to Endpoint entity
impl From<EndpointModel> for Endpoint {
    fn from(model: EndpointModel) -> Self {
        Endpoint {
            guild_id: GuildId::new(model.guild_id),
            guild_name: model.guild_name,
            channel_id: ChannelId::new(model.channel_id),
            token: model.token,
            locked: model.locked,
            linked_to: model.linked_to.map(ChannelId::new),
            open_since: model.open_since,
            mode: LinkMode::from(model.mode),
        }
    }
}

/// Convert Endpoint entity reference to values for database insertion
pub struct EndpointInsert<'a> {
    pub guild_id: i64,
    pub guild_name: &'a str,
    pub channel_id: i64,
    pub token: &'a str,
    pub locked: bool,
    pub linked_to: Option<i64>,
    pub open_since: chrono::DateTime<chrono::Utc>,
    pub mode: i16,
}

impl<'a> EndpointInsert<'a> {
    pub fn new(endpoint: &'a Endpoint) -> Self {
        Self {
            guild_id: endpoint.guild_id.into_inner(),
            guild_name: &endpoint.guild_name,
            channel_id: endpoint.channel_id.into_inner(),
            token: &endpoint.token,
            locked: endpoint.locked,
            linked_to: endpoint.linked_to.map(ChannelId::into_inner),
            open_since: endpoint.open_since,
            mode: endpoint.mode.as_i16(),
        }
    }
}
