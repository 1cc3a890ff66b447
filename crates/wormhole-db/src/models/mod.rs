//! Database models - SQLx-compatible structs for PostgreSQL tables

mod endpoint;

pub use endpoint::EndpointModel;
