/// Persisted capture settings
///
/// This struct stores the knobs for the capture pipeline.
/// It is serialized to JSON next to the database, so preferences
/// survive across runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// All user-tunable capture parameters
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Which camera to open (0 = the system default device)
    pub device_index: u32,

    /// JPEG quality for stored pictures (1-100)
    /// Higher = larger payloads, better fidelity
    pub jpeg_quality: u8,

    /// Mirror the live preview horizontally (selfie view).
    /// The stored picture is unmirrored either way.
    pub mirror_preview: bool,

    /// How long one preview iteration waits for a key press, in milliseconds.
    /// Short enough that frame reads never stall.
    pub poll_wait_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            jpeg_quality: 80,
            mirror_preview: true,
            poll_wait_ms: 30,
        }
    }
}

impl CaptureSettings {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Where the settings file lives: next to the database.
    pub fn default_path() -> PathBuf {
        let mut path = super::library::Library::default_db_path();
        path.set_file_name("settings.json");
        path
    }

    /// Load settings from disk, falling back to defaults if the file is
    /// missing or unreadable. Never fails: a corrupt settings file should not
    /// keep the app from starting.
    pub fn load_or_default(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|json| Self::from_json(&json).ok())
            .unwrap_or_default()
    }

    /// Write settings to disk.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_round_trip() {
        let mut settings = CaptureSettings::default();
        settings.device_index = 2;
        settings.jpeg_quality = 95;
        settings.mirror_preview = false;

        let json = settings.to_json().unwrap();
        let restored = CaptureSettings::from_json(&json).unwrap();

        assert_eq!(settings, restored);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = CaptureSettings::load_or_default(&path);
        assert_eq!(settings, CaptureSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = CaptureSettings::default();
        settings.jpeg_quality = 60;
        settings.save(&path).unwrap();

        assert_eq!(CaptureSettings::load_or_default(&path), settings);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(
            CaptureSettings::load_or_default(&path),
            CaptureSettings::default()
        );
    }
}
