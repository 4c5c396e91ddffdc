// src/repositories/json/commands.rs

use std::path::PathBuf;

use async_trait::async_trait;

use glowbot_common::models::command::CommandTable;
use glowbot_common::traits::repository_traits::CommandRepository;

use crate::repositories::json::{read_json_or_default, write_json_atomic};
use crate::Error;

/// Command table stored as a single JSON object, trigger phrase as key.
/// Key order in the file is the scan order, so loads must not reorder.
#[derive(Debug, Clone)]
pub struct JsonCommandRepository {
    path: PathBuf,
}

impl JsonCommandRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CommandRepository for JsonCommandRepository {
    async fn load_commands(&self) -> Result<CommandTable, Error> {
        read_json_or_default(&self.path)
    }

    async fn save_commands(&self, table: &CommandTable) -> Result<(), Error> {
        write_json_atomic(&self.path, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_missing_file_gives_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonCommandRepository::new(dir.path().join("commands.json"));
        let table = repo.load_commands().await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn save_and_load_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.json");
        std::fs::write(
            &path,
            r#"{
                "!zulu": {"enabled": true, "timeout": 10},
                "!alpha": {"enabled": true},
                "!mid": {"enabled": false}
            }"#,
        )
        .unwrap();

        let repo = JsonCommandRepository::new(&path);
        let table = repo.load_commands().await.unwrap();
        let names: Vec<&str> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["!zulu", "!alpha", "!mid"]);

        repo.save_commands(&table).await.unwrap();
        let again = repo.load_commands().await.unwrap();
        let names: Vec<&str> = again.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["!zulu", "!alpha", "!mid"]);
    }
}
