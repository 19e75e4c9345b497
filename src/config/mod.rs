//! Game settings loaded from `settings.ron`.
//!
//! Missing or unreadable settings never stop the game: the defaults below
//! are used and a warning is logged.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::*;

pub const SETTINGS_FILE: &str = "settings.ron";

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let settings = load_settings_or_default();
        app.insert_resource(settings.key_bindings.clone());
        app.insert_resource(settings);
    }
}

/// Keyboard layout. Arrow keys always mirror the movement bindings.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub pause: KeyCode,
    pub quicksave: KeyCode,
    pub quickload: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::KeyE,
            pause: KeyCode::Escape,
            quicksave: KeyCode::F5,
            quickload: KeyCode::F9,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub screen_width: f32,
    pub screen_height: f32,
    pub player_speed: f32,
    pub player_name: String,
    pub player_gender: Gender,
    pub saves_dir: PathBuf,
    pub key_bindings: KeyBindings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            player_speed: DEFAULT_SPEED,
            player_name: String::from("James"),
            player_gender: Gender::Female,
            saves_dir: PathBuf::from("saved_games"),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl GameSettings {
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }
}

pub fn parse_settings(text: &str) -> Result<GameSettings, ron::error::SpannedError> {
    ron::from_str(text)
}

pub fn read_settings(path: &Path) -> Result<GameSettings, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    parse_settings(&text).map_err(|e| format!("Invalid settings in {}: {}", path.display(), e))
}

/// Looks next to the executable first, then in the working directory.
fn settings_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    {
        candidates.push(dir.join(SETTINGS_FILE));
    }
    candidates.push(PathBuf::from(SETTINGS_FILE));
    candidates
}

fn load_settings_or_default() -> GameSettings {
    for path in settings_candidates() {
        if !path.exists() {
            continue;
        }
        match read_settings(&path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                return settings;
            }
            Err(e) => {
                warn!("{}. Falling back to default settings.", e);
                return GameSettings::default();
            }
        }
    }
    GameSettings::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let settings = parse_settings("(player_speed: 5.0, saves_dir: \"saves\")").unwrap();
        assert_eq!(settings.player_speed, 5.0);
        assert_eq!(settings.saves_dir, PathBuf::from("saves"));
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
        assert_eq!(settings.key_bindings, KeyBindings::default());
    }

    #[test]
    fn test_settings_round_trip_through_ron() {
        let mut settings = GameSettings::default();
        settings.player_gender = Gender::Male;
        settings.key_bindings.interact = KeyCode::Space;
        let text = ron::to_string(&settings).unwrap();
        assert_eq!(parse_settings(&text).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "(player_speed: \"fast\")").unwrap();
        let err = read_settings(&path).unwrap_err();
        assert!(err.contains("Invalid settings"), "unexpected error: {err}");
    }

    #[test]
    fn test_shipped_settings_match_defaults() {
        let settings = parse_settings(include_str!("../../settings.ron")).unwrap();
        assert_eq!(settings, GameSettings::default());
    }
}
