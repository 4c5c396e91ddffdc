// File: glowbot-common/src/traits/repository_traits.rs

use async_trait::async_trait;

use crate::error::Error;
use crate::models::command::CommandTable;
use crate::models::credential::Secrets;
use crate::models::plaque::Plaque;

/// Read/write access to the command table. The table is owned by an external
/// editor process, so callers re-read on every dispatch decision rather than
/// caching.
#[async_trait]
pub trait CommandRepository: Send + Sync {
    async fn load_commands(&self) -> Result<CommandTable, Error>;
    async fn save_commands(&self, table: &CommandTable) -> Result<(), Error>;
}

#[async_trait]
pub trait SecretsRepository: Send + Sync {
    async fn load_secrets(&self) -> Result<Secrets, Error>;
    /// Must replace the file atomically so a crash mid-save cannot leave a
    /// truncated secrets file behind.
    async fn save_secrets(&self, secrets: &Secrets) -> Result<(), Error>;
}

#[async_trait]
pub trait PlaqueRepository: Send + Sync {
    async fn load_plaques(&self) -> Result<Vec<Plaque>, Error>;
    /// First plaque whose YouTube or Twitch name matches, case-insensitive.
    async fn find_plaque(&self, display_name: &str) -> Result<Option<Plaque>, Error>;
    async fn save_plaques(&self, plaques: &[Plaque]) -> Result<(), Error>;
}
