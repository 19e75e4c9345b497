//! Shared components, resources, events, and states for Dayspring.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

/// Cardinal direction. Serialized with the one-letter codes used in save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Default for Facing {
    fn default() -> Self {
        Facing::South
    }
}

impl Facing {
    /// Fixed processing order for held movement keys: up, down, left, right.
    /// The last accepted key in this order decides the final facing.
    pub const PRIORITY: [Facing; 4] = [Facing::North, Facing::South, Facing::West, Facing::East];

    pub fn code(self) -> &'static str {
        match self {
            Facing::North => "N",
            Facing::South => "S",
            Facing::East => "E",
            Facing::West => "W",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Facing::North),
            "S" => Some(Facing::South),
            "E" => Some(Facing::East),
            "W" => Some(Facing::West),
            _ => None,
        }
    }

    /// Screen-space unit step (y grows downward).
    pub fn step(self) -> Vec2 {
        match self {
            Facing::North => Vec2::new(0.0, -1.0),
            Facing::South => Vec2::new(0.0, 1.0),
            Facing::East => Vec2::new(1.0, 0.0),
            Facing::West => Vec2::new(-1.0, 0.0),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Facing::South => 0,
            Facing::North => 1,
            Facing::East => 2,
            Facing::West => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

// ═══════════════════════════════════════════════════════════════════════
// METRICS
// ═══════════════════════════════════════════════════════════════════════

/// Per-object deltas applied to [`Metrics`] on a successful interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionEffect {
    pub happiness: f32,
    pub time: f32,
    pub health: f32,
}

impl InteractionEffect {
    pub fn new(happiness: f32, time: f32, health: f32) -> Self {
        Self { happiness, time, health }
    }
}

/// The player's life stats. Unbounded: no clamping is applied anywhere.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub happiness: f32,
    /// In-game hours elapsed since the first day started.
    pub time: f32,
    pub money: f32,
    pub health: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(15.0, 0.0, 0.0, 10.0)
    }
}

impl Metrics {
    pub fn new(happiness: f32, time: f32, money: f32, health: f32) -> Self {
        Self { happiness, time, money, health }
    }

    pub fn change_metrics(&mut self, happiness_delta: f32, time_delta: f32, health_delta: f32) {
        self.happiness += happiness_delta;
        self.time += time_delta;
        self.health += health_delta;
    }

    pub fn apply(&mut self, effect: InteractionEffect) {
        self.change_metrics(effect.happiness, effect.time, effect.health);
    }

    /// Clock readout for the HUD, e.g. `Day 1, 09:30`.
    ///
    /// Days begin at [`DAY_START_HOUR`]. Negative times roll back into
    /// earlier days, so the output is defined for every input.
    pub fn format_time(&self) -> String {
        let total_minutes =
            (self.time as f64 * 60.0).round() as i64 + DAY_START_HOUR * MINUTES_PER_HOUR;
        let day = total_minutes.div_euclid(MINUTES_PER_DAY) + 1;
        let minute_of_day = total_minutes.rem_euclid(MINUTES_PER_DAY);
        format!(
            "Day {}, {:02}:{:02}",
            day,
            minute_of_day / MINUTES_PER_HOUR,
            minute_of_day % MINUTES_PER_HOUR
        )
    }

    /// Funds with thousands separators, fractional part dropped.
    pub fn format_funds(&self) -> String {
        let whole = self.money.trunc() as i64;
        let digits: Vec<char> = whole.unsigned_abs().to_string().chars().collect();
        let mut result = String::new();
        if whole < 0 {
            result.push('-');
        }
        result.push('£');
        for (i, ch) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(*ch);
        }
        result
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD OBJECTS — spawned by whoever loads the current scene
// ═══════════════════════════════════════════════════════════════════════

/// Something the player can bump into and interact with.
/// `position` is the top-left corner of its [`OBJECT_SIZE`] footprint.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: String,
    pub position: Vec2,
    pub effect: InteractionEffect,
}

impl WorldObject {
    pub fn new(id: impl Into<String>, position: Vec2, effect: InteractionEffect) -> Self {
        Self {
            id: id.into(),
            position,
            effect,
        }
    }

    pub fn footprint(&self) -> Rect {
        Rect::from_corners(self.position, self.position + Vec2::splat(OBJECT_SIZE))
    }
}

/// Screen and scene the player is currently in. Scene keys are opaque to
/// this crate; the scene loader resolves them.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentScene {
    pub screen: String,
    pub scene: String,
}

impl Default for CurrentScene {
    fn default() -> Self {
        Self {
            screen: String::from("game"),
            scene: String::from("home"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Up,
    Down,
    Left,
    Right,
    Interact,
}

impl GameKey {
    pub fn for_direction(facing: Facing) -> Self {
        match facing {
            Facing::North => GameKey::Up,
            Facing::South => GameKey::Down,
            Facing::West => GameKey::Left,
            Facing::East => GameKey::Right,
        }
    }
}

/// Game actions sampled once per frame. Systems read this instead of
/// touching `ButtonInput` directly.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Keys held this frame.
    pub held: Vec<GameKey>,
    pub pause: bool,
    pub quicksave: bool,
    pub quickload: bool,
}

impl PlayerInput {
    pub fn holding(keys: &[GameKey]) -> Self {
        Self {
            held: keys.to_vec(),
            ..Default::default()
        }
    }

    pub fn is_held(&self, key: GameKey) -> bool {
        self.held.contains(&key)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent after the player successfully interacted with an object.
#[derive(Event, Debug, Clone)]
pub struct InteractionEvent {
    pub object_id: String,
    pub effect: InteractionEffect,
}

/// Sent by the scene loader when the player enters a new screen/scene.
#[derive(Event, Debug, Clone)]
pub struct SceneChangeEvent {
    pub screen: String,
    pub scene: String,
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE DATA — the on-disk record, one JSON file per save name
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub gender: Gender,
    /// Older saves carry no facing; those load facing south.
    #[serde(default)]
    pub facing: Option<Facing>,
    pub position: PositionRecord,
    pub speed: f32,
}

impl PlayerRecord {
    /// Rejects values that would poison movement maths.
    pub fn validate(&self) -> Result<(), String> {
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err(format!(
                "player.position must be finite, got ({}, {})",
                self.position.x, self.position.y
            ));
        }
        if !self.speed.is_finite() {
            return Err(format!("player.speed must be finite, got {}", self.speed));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub current_screen: String,
    pub current_scene: String,
    pub player: PlayerRecord,
    /// Absent in older saves; those start from new-game metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Player sprite is drawn at this size, top-left at the player position.
pub const SPRITE_SIZE: f32 = 200.0;
pub const HITBOX_OFFSET: Vec2 = Vec2::new(55.0, 40.0);
pub const HITBOX_SIZE: Vec2 = Vec2::new(90.0, 130.0);

pub const OBJECT_SIZE: f32 = 128.0;
pub const INTERACTION_THRESHOLD: f32 = 128.0;

/// Pixels per tick.
pub const DEFAULT_SPEED: f32 = 3.0;

pub const DAY_START_HOUR: i64 = 8;
pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;
