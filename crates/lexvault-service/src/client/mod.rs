//! Client provisioning and lookup.

pub mod service;

pub use service::{ClientService, CreateClientRequest};
