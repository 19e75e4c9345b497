pub mod animation;
pub mod collision;
pub mod interaction;
pub mod movement;
pub mod spawn;

use bevy::prelude::*;
use crate::shared::*;
use collision::{hitbox_at, leaves_screen, obstructed_directions, would_collide_with_objects};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn::load_player_animations);

        // -- Spawn player when we enter Playing --
        app.add_systems(OnEnter(GameState::Playing), spawn::spawn_player);

        // -- One tick: move, interact, animate --
        app.add_systems(
            Update,
            (
                movement::player_movement,
                interaction::player_interaction,
                movement::animate_player_sprite,
                movement::sync_player_transform,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );

        // -- Scene changes are applied even while paused so we never miss one --
        app.add_systems(Update, interaction::handle_scene_change);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Player controller
// ═══════════════════════════════════════════════════════════════════════════

/// Everything the player entity knows about itself. Positions are in screen
/// space: origin at the top-left corner, y growing downward.
#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub name: String,
    pub gender: Gender,
    pub facing: Facing,
    pub speed: f32,
    position: Vec2,
    hitbox: Rect,
    screen: Vec2,
    /// Edge-trigger latch: true while the interact key may fire again.
    pub not_interacting: bool,
    /// Whether the last `move_player` call moved the player.
    pub is_moving: bool,
    /// Largest gap between hitbox and object footprint that still counts as "nearby".
    pub interaction_threshold: f32,
}

impl PlayerController {
    pub fn new(name: impl Into<String>, gender: Gender, speed: f32, screen: Vec2) -> Self {
        let position = spawn_point(screen);
        Self {
            name: name.into(),
            gender,
            facing: Facing::South,
            speed,
            position,
            hitbox: hitbox_at(position),
            screen,
            not_interacting: true,
            is_moving: false,
            interaction_threshold: INTERACTION_THRESHOLD,
        }
    }

    pub fn from_record(record: &PlayerRecord, screen: Vec2) -> Self {
        let mut controller = Self::new(record.name.clone(), record.gender, record.speed, screen);
        controller.deserialize(record);
        controller
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.hitbox = hitbox_at(position);
    }

    /// Accepts only `N`, `S`, `E` or `W`; anything else is ignored.
    pub fn set_facing_code(&mut self, code: &str) {
        if let Some(facing) = Facing::from_code(code) {
            self.facing = facing;
        }
    }

    /// Applies every held direction in [`Facing::PRIORITY`] order. Each key is
    /// judged on its own candidate hitbox, so a blocked axis never stops the
    /// other one from moving. Returns whether the player moved at all.
    pub fn move_player(&mut self, input: &PlayerInput, objects: &[&WorldObject]) -> bool {
        let obstructed = obstructed_directions(self.hitbox, self.screen.x, self.screen.y);
        let mut moved = false;

        for direction in Facing::PRIORITY {
            if !input.is_held(GameKey::for_direction(direction)) || obstructed.contains(&direction) {
                continue;
            }

            let candidate = self.position + direction.step() * self.speed;
            let candidate_hitbox = hitbox_at(candidate);
            if leaves_screen(candidate_hitbox, direction, self.screen.x, self.screen.y)
                || would_collide_with_objects(candidate_hitbox, objects)
            {
                continue;
            }

            self.position = candidate;
            self.hitbox = candidate_hitbox;
            self.facing = direction;
            moved = true;
        }

        self.is_moving = moved;
        moved
    }

    /// Fires at most once per press of the interact key. With no object
    /// nearby nothing happens at all, the latch included.
    pub fn interact(
        &mut self,
        input: &PlayerInput,
        nearby: Option<&WorldObject>,
        metrics: &mut Metrics,
    ) -> Option<InteractionEffect> {
        let object = nearby?;

        if !input.is_held(GameKey::Interact) {
            self.not_interacting = true;
            return None;
        }
        if !self.not_interacting {
            return None;
        }

        self.not_interacting = false;
        metrics.apply(object.effect);
        Some(object.effect)
    }

    /// The closest object within `interaction_threshold`; ties go to the
    /// earlier object in the list.
    pub fn nearest_interactable<'a>(&self, objects: &[&'a WorldObject]) -> Option<&'a WorldObject> {
        let mut best: Option<(&'a WorldObject, f32)> = None;
        for &obj in objects {
            let gap = collision::gap_between(self.hitbox, obj.footprint());
            if gap > self.interaction_threshold {
                continue;
            }
            if best.map_or(true, |(_, best_gap)| gap < best_gap) {
                best = Some((obj, gap));
            }
        }
        best.map(|(obj, _)| obj)
    }

    /// Moves back to the spawn point so a new scene never starts with the
    /// player inside an object.
    pub fn reset(&mut self) {
        self.set_position(spawn_point(self.screen));
    }

    pub fn serialize(&self) -> PlayerRecord {
        PlayerRecord {
            name: self.name.clone(),
            gender: self.gender,
            facing: Some(self.facing),
            position: PositionRecord {
                x: self.position.x,
                y: self.position.y,
            },
            speed: self.speed,
        }
    }

    pub fn deserialize(&mut self, record: &PlayerRecord) {
        self.name = record.name.clone();
        self.gender = record.gender;
        self.facing = record.facing.unwrap_or_default();
        self.speed = record.speed;
        self.set_position(Vec2::new(record.position.x, record.position.y));
        self.not_interacting = true;
        self.is_moving = false;
    }
}

/// Draw order: above world objects.
pub const PLAYER_Z: f32 = 10.0;

/// One sixth across, halfway down.
pub fn spawn_point(screen: Vec2) -> Vec2 {
    Vec2::new(screen.x / 6.0, screen.y / 2.0)
}

/// Screen-space sprite position → Bevy world translation (centered origin, y up).
pub fn screen_to_world(position: Vec2, screen: Vec2, z: f32) -> Vec3 {
    let center = position + Vec2::splat(SPRITE_SIZE / 2.0);
    Vec3::new(center.x - screen.x / 2.0, screen.y / 2.0 - center.y, z)
}
