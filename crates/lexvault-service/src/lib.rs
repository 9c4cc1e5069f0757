//! # lexvault-service
//!
//! Use-case services for LexVault. Each service receives its collaborators
//! through its constructor (`Arc` handles and core traits), checks the
//! caller's role, performs the operation, and records an audit event.

pub mod audit;
pub mod auth;
pub mod client;
pub mod context;
pub mod document;
pub mod user;

pub use auth::AuthService;
pub use client::ClientService;
pub use context::RequestContext;
pub use document::DocumentService;
pub use user::AdminUserService;
