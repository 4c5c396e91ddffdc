// src/repositories/json/plaques.rs

use std::path::PathBuf;

use async_trait::async_trait;

use glowbot_common::models::plaque::Plaque;
use glowbot_common::traits::repository_traits::PlaqueRepository;

use crate::repositories::json::{read_json_or_default, write_json_atomic};
use crate::Error;

/// Plaque registry stored as a JSON array.
#[derive(Debug, Clone)]
pub struct JsonPlaqueRepository {
    path: PathBuf,
}

impl JsonPlaqueRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PlaqueRepository for JsonPlaqueRepository {
    async fn load_plaques(&self) -> Result<Vec<Plaque>, Error> {
        read_json_or_default(&self.path)
    }

    async fn find_plaque(&self, display_name: &str) -> Result<Option<Plaque>, Error> {
        let plaques = self.load_plaques().await?;
        Ok(plaques
            .into_iter()
            .find(|p| p.matches_display_name(display_name)))
    }

    async fn save_plaques(&self, plaques: &[Plaque]) -> Result<(), Error> {
        write_json_atomic(&self.path, &plaques)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_sample(path: &std::path::Path) {
        std::fs::write(
            path,
            r##"[
                {
                    "YT_Name": "CoolFan",
                    "twitchusername": "coolfan_tv",
                    "Leds_colour": "#f6de15",
                    "Leds": "86,85,84"
                },
                {
                    "YT_Name": "OtherFan",
                    "Leds_colour": "#00ff00",
                    "Leds": "1,2"
                }
            ]"##,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn find_matches_either_name_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plaques.json");
        write_sample(&path);

        let repo = JsonPlaqueRepository::new(&path);
        let by_yt = repo.find_plaque("coolfan").await.unwrap();
        assert_eq!(by_yt.unwrap().yt_name, "CoolFan");

        let by_twitch = repo.find_plaque("COOLFAN_TV").await.unwrap();
        assert_eq!(by_twitch.unwrap().yt_name, "CoolFan");

        let missing = repo.find_plaque("nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn missing_file_gives_no_plaques() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonPlaqueRepository::new(dir.path().join("plaques.json"));
        assert!(repo.load_plaques().await.unwrap().is_empty());
        assert!(repo.find_plaque("anyone").await.unwrap().is_none());
    }
}
