//! Service context - dependency container for services
//!
//! Holds the two ports the services operate through plus the send throttle.

use std::sync::Arc;

use wormhole_common::RelayConfig;
use wormhole_core::traits::{EndpointRepository, MessageTransport};

use super::throttle::SendThrottle;

/// Service context containing all dependencies
///
/// This is the dependency container passed to the registry and relay
/// services. It provides access to:
/// - The endpoint repository (persistent wormhole table)
/// - The messaging transport (platform delivery)
/// - The per-user send throttle
#[derive(Clone)]
pub struct ServiceContext {
    endpoint_repo: Arc<dyn EndpointRepository>,
    transport: Arc<dyn MessageTransport>,
    throttle: Arc<SendThrottle>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        endpoint_repo: Arc<dyn EndpointRepository>,
        transport: Arc<dyn MessageTransport>,
        relay: &RelayConfig,
    ) -> Self {
        Self {
            endpoint_repo,
            transport,
            throttle: Arc::new(SendThrottle::new(relay)),
        }
    }

    /// Get the endpoint repository
    pub fn endpoint_repo(&self) -> &dyn EndpointRepository {
        self.endpoint_repo.as_ref()
    }

    /// Get the messaging transport
    pub fn transport(&self) -> &dyn MessageTransport {
        self.transport.as_ref()
    }

    /// Get the send throttle
    pub fn throttle(&self) -> &SendThrottle {
        &self.throttle
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("endpoint_repo", &"dyn EndpointRepository")
            .field("transport", &"dyn MessageTransport")
            .finish()
    }
}
