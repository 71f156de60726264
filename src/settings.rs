//! Player preferences
//!
//! Persisted separately from rankings. Includes the remembered player name
//! so the name prompt can be pre-filled next visit.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::platform::storage::{Storage, load_json, save_json};
use crate::sim::sanitize_player_name;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master sound toggle
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Player ===
    /// At most 10 characters, trimmed
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 0.5,
            bgm_volume: 0.3,
            mute_on_blur: true,
            player_name: String::new(),
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "rabbit_chase_settings";

    /// Store a sanitized name and return it
    pub fn set_player_name(&mut self, name: &str) -> &str {
        self.player_name = sanitize_player_name(name);
        &self.player_name
    }

    /// Volume to play effects at, 0 when sound is off
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Music volume for the current window focus, 0 when sound is off
    pub fn bgm_level(&self, focused: bool) -> f32 {
        if !self.sound_enabled || (!focused && self.mute_on_blur) {
            return 0.0;
        }
        (self.master_volume * self.bgm_volume).clamp(0.0, 1.0)
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Load from storage, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                // Stored data may predate the length limit
                settings.player_name = sanitize_player_name(&settings.player_name);
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Discarding stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), Error> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_round_trip_through_storage() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.set_player_name("  Usagi  ");
        settings.toggle_sound();
        settings.save(&mut storage).unwrap();

        let loaded = Settings::load(&storage);
        assert_eq!(loaded.player_name, "Usagi");
        assert!(!loaded.sound_enabled);
    }

    #[test]
    fn test_effective_volume_respects_toggle() {
        let mut settings = Settings::default();
        assert!((settings.effective_sfx_volume() - 0.4).abs() < 1e-6);
        settings.toggle_sound();
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_bgm_level_follows_focus() {
        let mut settings = Settings::default();
        assert!((settings.bgm_level(true) - 0.24).abs() < 1e-6);
        assert_eq!(settings.bgm_level(false), 0.0);

        settings.mute_on_blur = false;
        assert!((settings.bgm_level(false) - 0.24).abs() < 1e-6);

        settings.toggle_sound();
        assert_eq!(settings.bgm_level(true), 0.0);
    }

    #[test]
    fn test_old_long_name_is_cut() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{ "player_name": "averyveryverylongname" }"#)
            .unwrap();
        let loaded = Settings::load(&storage);
        assert_eq!(loaded.player_name, "averyveryv");
        assert!(loaded.sound_enabled);
    }
}
