//! # wormhole-service
//!
//! Application layer containing the wormhole registry, the relay send path,
//! the per-user send throttle, and DTO views.

pub mod dto;
pub mod services;

pub use dto::{InfoView, LinkEstablished, RelayRequest, TokenView, UnlinkedPair};
pub use services::{RelayService, SendThrottle, ServiceContext, WormholeRegistry};
