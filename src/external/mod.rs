//! Clients for the outside world.

pub mod client;

pub use client::{HttpClientConfig, HttpExecutor};
