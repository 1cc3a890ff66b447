//! # wormhole-db
//!
//! Database layer implementing the endpoint repository trait with PostgreSQL
//! via SQLx.
//!
//! ## Overview
//!
//! This crate provides the PostgreSQL implementation of the
//! `EndpointRepository` port defined in `wormhole-core`. It handles:
//!
//! - Connection pool management
//! - The database model with SQLx `FromRow` derive
//! - Entity ↔ Model mapping
//! - The repository implementation, including the two transactional
//!   dual-row operations (`link`, `unlink`)
//!
//! The `migrations/` directory carries the `wormholes` table definition with
//! UNIQUE constraints on `guild_id` and `token` backing the invariants the
//! domain layer enforces.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wormhole_db::pool::{create_pool, DatabaseConfig};
//! use wormhole_db::PgEndpointRepository;
//! use wormhole_core::EndpointRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let repo = PgEndpointRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::PgEndpointRepository;
