//! Backend integration: request/result types, the HTTP client, and the
//! dispatcher task that bridges the UI thread to the network.

pub mod client;
pub mod task;
pub mod types;
