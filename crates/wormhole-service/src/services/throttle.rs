//! Per-user send throttling
//!
//! Applied as a decorator on the relay send path, independent of the
//! registry. Keyed by (user, channel) so one noisy user cannot consume
//! another channel's budget.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota};

use wormhole_common::RelayConfig;
use wormhole_core::value_objects::{ChannelId, UserId};
use wormhole_core::WormholeError;

/// Keyed rate limiter over relay send invocations
pub struct SendThrottle {
    limiter: DefaultKeyedRateLimiter<(UserId, ChannelId)>,
}

impl SendThrottle {
    /// Create a throttle allowing `relay.throttle_messages` sends per
    /// `relay.throttle_window_secs` per (user, channel) pair.
    pub fn new(relay: &RelayConfig) -> Self {
        let messages = NonZeroU32::new(relay.throttle_messages).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(relay.throttle_window_secs.max(1));

        let quota = Quota::with_period(window / messages.get())
            .unwrap_or_else(|| Quota::per_minute(messages))
            .allow_burst(messages);

        Self {
            limiter: DefaultKeyedRateLimiter::keyed(quota),
        }
    }

    /// Record one send attempt, failing `RateLimited` when the pair has
    /// exhausted its budget for the current window.
    pub fn check(&self, user_id: UserId, channel_id: ChannelId) -> Result<(), WormholeError> {
        self.limiter
            .check_key(&(user_id, channel_id))
            .map_err(|_| WormholeError::RateLimited)
    }
}

impl std::fmt::Debug for SendThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendThrottle").finish()
    }
}
