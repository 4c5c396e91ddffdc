// File: src/actions/sound.rs

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use glowbot_common::traits::executor_traits::SoundPlayer;

use crate::Error;

/// Plays mp3 clips from a directory through an external player binary.
/// The directory is re-scanned on every play, so newly dropped-in clips
/// are available immediately.
pub struct SoundBoard {
    sounds_dir: PathBuf,
    player_bin: String,
}

impl SoundBoard {
    pub fn new(sounds_dir: impl Into<PathBuf>, player_bin: impl Into<String>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
            player_bin: player_bin.into(),
        }
    }

    /// Clip name (lowercased file stem) to path, for every mp3 present.
    async fn build_sound_index(&self) -> Result<HashMap<String, PathBuf>, Error> {
        let mut index = HashMap::new();
        let mut entries = tokio::fs::read_dir(&self.sounds_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                index.insert(stem.to_lowercase(), path);
            }
        }
        Ok(index)
    }
}

#[async_trait]
impl SoundPlayer for SoundBoard {
    async fn play(&self, sound_name: &str) -> Result<(), Error> {
        let index = self.build_sound_index().await?;
        let path = match index.get(&sound_name.to_lowercase()) {
            Some(p) => p.clone(),
            None => {
                warn!("(SoundBoard) no sound found for '{}'", sound_name);
                return Ok(());
            }
        };

        debug!("(SoundBoard) playing {:?}", path);
        let status = Command::new(&self.player_bin)
            .arg(&path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Platform(format!(
                "sound player exited with {} for {:?}",
                status, path
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn index_maps_lowercased_stems_to_mp3s_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Airhorn.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("tada.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let board = SoundBoard::new(dir.path(), "mpg123");
        let index = board.build_sound_index().await.unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.contains_key("airhorn"));
        assert!(index.contains_key("tada"));
    }

    #[tokio::test]
    async fn unknown_sound_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let board = SoundBoard::new(dir.path(), "definitely-not-a-player");
        board.play("missing").await.unwrap();
    }
}
