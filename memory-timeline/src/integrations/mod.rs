//! External integrations
//!
//! Clients for services this program talks to over the network.

pub mod memory_client;

pub use memory_client::{ApiError, MemoryBackend, MemoryClient};
