//! Endpoint database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the wormholes table
#[derive(Debug, Clone, FromRow)]
pub struct EndpointModel {
    pub guild_id: i64,
    pub guild_name: String,
    pub channel_id: i64,
    pub token: String,
    pub locked: bool,
    pub linked_to: Option<i64>,
    pub open_since: DateTime<Utc>,
    pub mode: i16,
}

impl EndpointModel {
    /// Check if the row participates in a link
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked_to.is_some()
    }
}
