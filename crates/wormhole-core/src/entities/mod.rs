//! Domain entities - core business objects

mod endpoint;

pub use endpoint::{generate_token, Endpoint, LinkMode, TOKEN_LEN};
