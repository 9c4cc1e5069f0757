//! Document operations inside client folders.

pub mod service;

pub use service::DocumentService;
