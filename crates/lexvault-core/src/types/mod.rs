//! Core type definitions used across the LexVault workspace.

pub mod id;

pub use id::*;
