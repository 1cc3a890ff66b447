//! Ports - interfaces the relay core depends on
//!
//! The domain layer defines what it needs from persistence and from the chat
//! platform; infrastructure crates provide the implementations.

mod repositories;
mod transport;

pub use repositories::{EndpointRepository, RepoResult};
pub use transport::{MessageTransport, RelayMessage, TransportError, TransportResult};
