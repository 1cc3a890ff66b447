//! Business logic services
//!
//! The registry owns endpoint lifecycle and lookup; the relay composes the
//! registry's forward resolution with throttling and transport delivery.

pub mod context;
pub mod registry;
pub mod relay;
pub mod throttle;

// Re-export all services for convenience
pub use context::ServiceContext;
pub use registry::WormholeRegistry;
pub use relay::RelayService;
pub use throttle::SendThrottle;
