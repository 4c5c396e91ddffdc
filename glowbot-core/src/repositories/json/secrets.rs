// src/repositories/json/secrets.rs

use std::path::PathBuf;

use async_trait::async_trait;

use glowbot_common::models::credential::Secrets;
use glowbot_common::traits::repository_traits::SecretsRepository;

use crate::repositories::json::{read_json_or_default, write_json_atomic};
use crate::Error;

#[derive(Debug, Clone)]
pub struct JsonSecretsRepository {
    path: PathBuf,
}

impl JsonSecretsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SecretsRepository for JsonSecretsRepository {
    async fn load_secrets(&self) -> Result<Secrets, Error> {
        read_json_or_default(&self.path)
    }

    async fn save_secrets(&self, secrets: &Secrets) -> Result<(), Error> {
        write_json_atomic(&self.path, secrets)
    }
}
