//! Data transfer objects
//!
//! Views returned by registry read operations and the request shape the relay
//! send path consumes. The hosting command framework maps these to whatever
//! presentation the platform uses.

mod views;

pub use views::{InfoView, LinkEstablished, RelayRequest, TokenView, UnlinkedPair};
