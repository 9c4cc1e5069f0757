//! Client root lookup.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::ClientId;

/// Maps a client identifier to the absolute path of its root folder.
#[async_trait]
pub trait ClientDirectory: Send + Sync + 'static {
    /// Return the client's root folder, or `None` when the client is unknown.
    async fn client_root(&self, client_id: ClientId) -> AppResult<Option<PathBuf>>;
}
