//! Network layer: wire types and the REST transport.

pub mod api;
pub mod types;

pub use api::{Api, HttpApi};
pub use types::ApiError;
