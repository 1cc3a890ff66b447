//! # wormhole-core
//!
//! Domain layer containing entities, value objects, domain errors, and the
//! repository/transport traits the relay depends on. This crate has zero
//! dependencies on infrastructure (database, chat platform client, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{generate_token, Endpoint, LinkMode, TOKEN_LEN};
pub use error::WormholeError;
pub use traits::{
    EndpointRepository, MessageTransport, RelayMessage, RepoResult, TransportError,
    TransportResult,
};
pub use value_objects::{ChannelId, GuildId, IdParseError, UserId};
