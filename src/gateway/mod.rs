//! Gateway Module
//!
//! Request relay and the HTTP surface in front of it.

pub mod relay;
pub mod server;

pub use relay::RelayGateway;
pub use server::{router, HttpServer, GENERATE_PATH, HEALTH_PATH};
