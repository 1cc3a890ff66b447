//! PostgreSQL implementation of EndpointRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use wormhole_core::traits::{EndpointRepository, RepoResult};
use wormhole_core::value_objects::{ChannelId, GuildId};
use wormhole_core::{Endpoint, WormholeError};

use crate::mappers::EndpointInsert;
use crate::models::EndpointModel;

use super::error::{map_db_error, map_unique_violation};

const COLUMNS: &str = "guild_id, guild_name, channel_id, token, locked, linked_to, open_since, mode";

/// PostgreSQL implementation of EndpointRepository
#[derive(Clone)]
pub struct PgEndpointRepository {
    pool: PgPool,
}

impl PgEndpointRepository {
    /// Create a new PgEndpointRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        endpoint: &Endpoint,
    ) -> RepoResult<()> {
        let row = EndpointInsert::new(endpoint);
        sqlx::query(
            r#"
            INSERT INTO wormholes (guild_id, guild_name, channel_id, token, locked, linked_to, open_since, mode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.guild_id)
        .bind(row.guild_name)
        .bind(row.channel_id)
        .bind(row.token)
        .bind(row.locked)
        .bind(row.linked_to)
        .bind(row.open_since)
        .bind(row.mode)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_unique_violation(e, || WormholeError::AlreadyOpen(endpoint.guild_id)))?;

        Ok(())
    }
}

#[async_trait]
impl EndpointRepository for PgEndpointRepository {
    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: GuildId) -> RepoResult<Option<Endpoint>> {
        let result = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE guild_id = $1"
        ))
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Endpoint::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: ChannelId) -> RepoResult<Option<Endpoint>> {
        let result = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE channel_id = $1"
        ))
        .bind(channel_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Endpoint::from))
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Endpoint>> {
        let result = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Endpoint::from))
    }

    #[instrument(skip(self))]
    async fn find_by_linked_to(&self, channel_id: ChannelId) -> RepoResult<Option<Endpoint>> {
        let result = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE linked_to = $1"
        ))
        .bind(channel_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Endpoint::from))
    }

    #[instrument(skip(self, token))]
    async fn token_exists(&self, token: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM wormholes WHERE token = $1)",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, endpoint))]
    async fn create(&self, endpoint: &Endpoint) -> RepoResult<()> {
        let row = EndpointInsert::new(endpoint);
        sqlx::query(
            r#"
            INSERT INTO wormholes (guild_id, guild_name, channel_id, token, locked, linked_to, open_since, mode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.guild_id)
        .bind(row.guild_name)
        .bind(row.channel_id)
        .bind(row.token)
        .bind(row.locked)
        .bind(row.linked_to)
        .bind(row.open_since)
        .bind(row.mode)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || WormholeError::AlreadyOpen(endpoint.guild_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_channel(&self, channel_id: ChannelId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM wormholes WHERE channel_id = $1")
            .bind(channel_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(WormholeError::NotFound(channel_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_locked(&self, guild_id: GuildId, locked: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE wormholes SET locked = $2 WHERE guild_id = $1")
            .bind(guild_id.into_inner())
            .bind(locked)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(WormholeError::NoEndpoint(guild_id));
        }

        Ok(())
    }

    // The row-lock on the target closes the window where two guilds consume
    // the same token concurrently: the second transaction blocks on FOR
    // UPDATE and then observes locked = TRUE.
    #[instrument(skip(self, requester, target_token))]
    async fn link(&self, requester: &Endpoint, target_token: &str) -> RepoResult<Endpoint> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let target = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE token = $1 FOR UPDATE"
        ))
        .bind(target_token)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(WormholeError::UnknownToken)?;

        if target.locked {
            return Err(WormholeError::TokenLocked);
        }

        Self::insert_in_tx(&mut tx, requester).await?;

        sqlx::query("UPDATE wormholes SET locked = TRUE, linked_to = $2 WHERE guild_id = $1")
            .bind(target.guild_id)
            .bind(requester.channel_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Endpoint::from(target))
    }

    #[instrument(skip(self))]
    async fn unlink(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RepoResult<(Endpoint, Endpoint)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let remote = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE linked_to = $1 FOR UPDATE"
        ))
        .bind(channel_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(WormholeError::NoActiveLink)?;

        let local = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes WHERE guild_id = $1 FOR UPDATE"
        ))
        .bind(guild_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(WormholeError::NoEndpoint(guild_id))?;

        for gid in [remote.guild_id, local.guild_id] {
            sqlx::query("UPDATE wormholes SET linked_to = NULL, locked = FALSE WHERE guild_id = $1")
                .bind(gid)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        let mut local = Endpoint::from(local);
        let mut remote = Endpoint::from(remote);
        local.clear_link();
        remote.clear_link();

        Ok((local, remote))
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM wormholes")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn all(&self) -> RepoResult<Vec<Endpoint>> {
        let results = sqlx::query_as::<_, EndpointModel>(&format!(
            "SELECT {COLUMNS} FROM wormholes ORDER BY open_since"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Endpoint::from).collect())
    }
}
