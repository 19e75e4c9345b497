use bevy::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

use crate::config::GameSettings;
use crate::player::PlayerController;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_EXTENSION: &str = "json";
pub const QUICKSAVE_NAME: &str = "quicksave";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("save '{name}' not found")]
    NotFound { name: String },
    #[error("save '{name}' is malformed: {reason}")]
    MalformedData { name: String, reason: String },
    #[error("'{name}' is not a valid save name")]
    InvalidName { name: String },
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by UI or a keybind to write the current session under `name`.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent {
    pub name: String,
}

/// Sent by UI or a keybind to restore the session saved under `name`.
#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent {
    pub name: String,
}

/// Sent by SavePlugin after a save completes (success or failure).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub name: String,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Sent by SavePlugin after a load completes.
#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub name: String,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Starts a fresh session: new-game metrics, default scene, player on spawn.
#[derive(Event, Debug, Clone)]
pub struct NewGameEvent {
    pub player_name: String,
    pub gender: Gender,
}

// ═══════════════════════════════════════════════════════════════════════
// SESSION STORE — one JSON file per save name
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SessionError> {
        let invalid = name.trim().is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\']);
        if invalid {
            return Err(SessionError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.{}", name, SAVE_EXTENSION)))
    }

    /// Save names, oldest first by file creation time. A missing saves
    /// directory simply means there are no saves yet.
    pub fn list_saves(&self) -> Result<Vec<String>, SessionError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let suffix = format!(".{}", SAVE_EXTENSION);
        let mut saves = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SessionError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(name) = file_name.strip_suffix(&suffix) else {
                continue;
            };
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            // Not every filesystem records creation time.
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(UNIX_EPOCH);
            saves.push((created, name.to_string()));
        }

        saves.sort();
        Ok(saves.into_iter().map(|(_, name)| name).collect())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Reads and fully validates a save. Nothing is applied anywhere, so a
    /// failed load leaves the running session untouched.
    pub fn load(&self, name: &str) -> Result<SaveRecord, SessionError> {
        let path = self.path_for(name)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        parse_record(name, &json)
    }

    /// Writes to a temp file first, then renames over the target.
    pub fn save(&self, name: &str, record: &SaveRecord) -> Result<(), SessionError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir).map_err(|source| SessionError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(record).map_err(|e| SessionError::MalformedData {
            name: name.to_string(),
            reason: format!("serialization failed: {}", e),
        })?;

        let tmp_path = path.with_extension(format!("{}.tmp", SAVE_EXTENSION));
        fs::write(&tmp_path, json).map_err(|source| SessionError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SessionError::Io { path, source });
        }
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), SessionError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SessionError::NotFound {
                name: name.to_string(),
            }),
            Err(source) => Err(SessionError::Io { path, source }),
        }
    }
}

/// Parses a save file body. Errors name the JSON path that failed,
/// e.g. `player: missing field `speed``.
pub fn parse_record(name: &str, json: &str) -> Result<SaveRecord, SessionError> {
    let malformed = |reason: String| SessionError::MalformedData {
        name: name.to_string(),
        reason,
    };

    let deserializer = &mut serde_json::Deserializer::from_str(json);
    let record: SaveRecord = serde_path_to_error::deserialize(deserializer).map_err(|e| {
        let path = e.path().to_string();
        if path == "." {
            malformed(e.into_inner().to_string())
        } else {
            malformed(format!("{}: {}", path, e.into_inner()))
        }
    })?;

    if record.current_scene.trim().is_empty() {
        return Err(malformed(String::from("currentScene is empty")));
    }
    record.player.validate().map_err(malformed)?;

    Ok(record)
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        // Tests may insert their own store before adding the plugin.
        if !app.world().contains_resource::<SessionStore>() {
            let dir = app
                .world()
                .get_resource::<GameSettings>()
                .map(|s| s.saves_dir.clone())
                .unwrap_or_else(|| GameSettings::default().saves_dir);
            app.insert_resource(SessionStore::new(dir));
        }

        app
            // Events emitted/received by this plugin
            .add_event::<SaveRequestEvent>()
            .add_event::<LoadRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_event::<LoadCompleteEvent>()
            .add_event::<NewGameEvent>()
            // Startup: report what is on disk
            .add_systems(Startup, scan_saves)
            .add_systems(
                Update,
                (
                    quicksave_keybind,
                    handle_new_game,
                    handle_save_request,
                    handle_load_request,
                )
                    .chain(),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn scan_saves(store: Res<SessionStore>) {
    match store.list_saves() {
        Ok(saves) => info!(
            "Save scan complete. Found {} saves in {}.",
            saves.len(),
            store.dir().display()
        ),
        Err(e) => warn!("Save scan failed: {}", e),
    }
}

pub fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    store: Res<SessionStore>,
    current_scene: Res<CurrentScene>,
    metrics: Res<Metrics>,
    query: Query<&PlayerController, With<Player>>,
) {
    for ev in save_events.read() {
        info!("Saving '{}'...", ev.name);

        let result = match query.get_single() {
            Ok(controller) => {
                let record = SaveRecord {
                    current_screen: current_scene.screen.clone(),
                    current_scene: current_scene.scene.clone(),
                    player: controller.serialize(),
                    metrics: Some(*metrics),
                };
                store.save(&ev.name, &record).map_err(|e| e.to_string())
            }
            Err(_) => Err(String::from("No player to save")),
        };

        match result {
            Ok(()) => {
                info!("Save '{}' succeeded.", ev.name);
                complete_events.send(SaveCompleteEvent {
                    name: ev.name.clone(),
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("Save '{}' FAILED: {}", ev.name, e);
                complete_events.send(SaveCompleteEvent {
                    name: ev.name.clone(),
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

pub fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    store: Res<SessionStore>,
    mut current_scene: ResMut<CurrentScene>,
    mut metrics: ResMut<Metrics>,
    mut query: Query<&mut PlayerController, With<Player>>,
) {
    for ev in load_events.read() {
        info!("Loading '{}'...", ev.name);

        let result = match store.load(&ev.name) {
            Ok(record) => match query.get_single_mut() {
                Ok(mut controller) => {
                    // Apply all loaded state
                    controller.deserialize(&record.player);
                    current_scene.screen = record.current_screen;
                    current_scene.scene = record.current_scene;
                    *metrics = record.metrics.unwrap_or_default();
                    Ok(())
                }
                Err(_) => Err(String::from("No player to load into")),
            },
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                info!("Load '{}' succeeded.", ev.name);
                complete_events.send(LoadCompleteEvent {
                    name: ev.name.clone(),
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("Load '{}' FAILED: {}", ev.name, e);
                complete_events.send(LoadCompleteEvent {
                    name: ev.name.clone(),
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

pub fn handle_new_game(
    mut new_game_events: EventReader<NewGameEvent>,
    mut current_scene: ResMut<CurrentScene>,
    mut metrics: ResMut<Metrics>,
    settings: Res<GameSettings>,
    mut query: Query<&mut PlayerController, With<Player>>,
) {
    for ev in new_game_events.read() {
        info!("Starting new game for '{}'", ev.player_name);

        *current_scene = CurrentScene::default();
        *metrics = Metrics::default();
        for mut controller in &mut query {
            *controller = PlayerController::new(
                ev.player_name.clone(),
                ev.gender,
                settings.player_speed,
                settings.screen_size(),
            );
        }

        info!("New game initialized.");
    }
}

/// F5 = quicksave, F9 = quickload. Both always use [`QUICKSAVE_NAME`],
/// whatever was last saved or loaded by name.
fn quicksave_keybind(
    player_input: Res<PlayerInput>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    mut load_writer: EventWriter<LoadRequestEvent>,
) {
    if player_input.quicksave {
        info!("Quicksave to '{}'", QUICKSAVE_NAME);
        save_writer.send(SaveRequestEvent {
            name: String::from(QUICKSAVE_NAME),
        });
    }
    if player_input.quickload {
        info!("Quickload from '{}'", QUICKSAVE_NAME);
        load_writer.send(LoadRequestEvent {
            name: String::from(QUICKSAVE_NAME),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn sample_record() -> SaveRecord {
        SaveRecord {
            current_screen: String::from("game"),
            current_scene: String::from("kitchen"),
            player: PlayerRecord {
                name: String::from("Ada"),
                gender: Gender::Female,
                facing: Some(Facing::East),
                position: PositionRecord { x: 12.5, y: 300.25 },
                speed: 3.0,
            },
            metrics: Some(Metrics::new(20.0, 1.0, 0.0, 10.0)),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("saves"));
        store.save("monday", &sample_record()).unwrap();

        assert!(store.exists("monday"));
        assert_eq!(store.load("monday").unwrap(), sample_record());
        // No temp file left behind.
        assert!(!dir.path().join("saves/monday.json.tmp").exists());
    }

    #[test]
    fn test_list_saves_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nothing_here"));
        assert!(store.list_saves().unwrap().is_empty());
    }

    #[test]
    fn test_list_saves_oldest_first_and_json_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        for name in ["zeta", "alpha", "mid"] {
            store.save(name, &sample_record()).unwrap();
            thread::sleep(Duration::from_millis(50));
        }
        fs::write(dir.path().join("notes.txt"), "not a save").unwrap();
        fs::create_dir(dir.path().join("folder.json")).unwrap();

        assert_eq!(store.list_saves().unwrap(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, SessionError::NotFound { ref name } if name == "ghost"));
    }

    #[test]
    fn test_missing_field_is_malformed_and_named() {
        let json = r#"{
            "currentScreen": "game",
            "currentScene": "home",
            "player": {"name": "Ada", "gender": "F", "position": {"x": 1, "y": 2}}
        }"#;
        let err = parse_record("broken", json).unwrap_err();
        match err {
            SessionError::MalformedData { name, reason } => {
                assert_eq!(name, "broken");
                assert!(reason.contains("speed"), "reason was: {reason}");
            }
            other => panic!("expected MalformedData, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_record("junk", "{ not json").unwrap_err();
        assert!(matches!(err, SessionError::MalformedData { .. }));
    }

    #[test]
    fn test_unknown_gender_is_malformed() {
        let json = r#"{
            "currentScreen": "game",
            "currentScene": "home",
            "player": {"name": "Ada", "gender": "X", "position": {"x": 1, "y": 2}, "speed": 3}
        }"#;
        assert!(matches!(
            parse_record("odd", json),
            Err(SessionError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_empty_scene_is_malformed() {
        let json = r#"{
            "currentScreen": "game",
            "currentScene": "  ",
            "player": {"name": "Ada", "gender": "F", "position": {"x": 1, "y": 2}, "speed": 3}
        }"#;
        assert!(matches!(
            parse_record("blank", json),
            Err(SessionError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_older_save_without_facing_or_metrics() {
        let json = r#"{
            "currentScreen": "game",
            "currentScene": "home",
            "player": {"name": "Ada", "gender": "M", "position": {"x": 1.5, "y": 2}, "speed": 3}
        }"#;
        let record = parse_record("legacy", json).unwrap();
        assert_eq!(record.player.facing, None);
        assert_eq!(record.metrics, None);
        assert_eq!(record.player.gender, Gender::Male);
        assert_eq!(record.player.position, PositionRecord { x: 1.5, y: 2.0 });
    }

    #[test]
    fn test_save_file_uses_camel_case_keys() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"currentScreen\""));
        assert!(json.contains("\"currentScene\""));
        assert!(json.contains("\"facing\":\"E\""));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        for name in ["", "  ", "..", "../escape", "a/b", "a\\b"] {
            assert!(
                matches!(store.save(name, &sample_record()), Err(SessionError::InvalidName { .. })),
                "name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.save("old", &sample_record()).unwrap();
        store.delete("old").unwrap();
        assert!(!store.exists("old"));
        assert!(matches!(store.delete("old"), Err(SessionError::NotFound { .. })));
    }
}
