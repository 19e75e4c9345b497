use bevy::prelude::*;
use crate::config::GameSettings;
use crate::shared::*;
use super::animation::{frame_path, AnimationController, AnimationTable};
use super::{screen_to_world, PlayerController, PLAYER_Z};

/// Walk-cycle images for both genders, loaded once at startup.
#[derive(Resource)]
pub struct PlayerAnimations(pub AnimationController<Handle<Image>>);

/// Index (0..3) of the image currently shown, kept for systems and tests
/// that care about the frame rather than the handle.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerSpriteFrame(pub usize);

/// Queue every player frame for loading. Headless apps have no asset
/// server; the player then simply keeps its placeholder sprite.
pub fn load_player_animations(mut commands: Commands, asset_server: Option<Res<AssetServer>>) {
    let Some(asset_server) = asset_server else {
        return;
    };

    let table = AnimationTable::build(|gender, facing, frame| {
        asset_server.load::<Image>(frame_path(gender, facing, frame))
    });
    commands.insert_resource(PlayerAnimations(AnimationController::new(table)));
    info!("Queued player animation frames for loading.");
}

/// Spawn the player entity with all necessary components.
/// Runs on `OnEnter(GameState::Playing)`.
pub fn spawn_player(
    mut commands: Commands,
    settings: Res<GameSettings>,
    animations: Option<Res<PlayerAnimations>>,
    existing: Query<Entity, With<Player>>,
) {
    // Guard: don't double-spawn when returning from Paused.
    if !existing.is_empty() {
        return;
    }

    let controller = PlayerController::new(
        settings.player_name.clone(),
        settings.player_gender,
        settings.player_speed,
        settings.screen_size(),
    );

    let mut sprite = Sprite {
        custom_size: Some(Vec2::splat(SPRITE_SIZE)),
        ..default()
    };
    if let Some(animations) = animations {
        sprite.image = animations
            .0
            .sprite(controller.gender, controller.facing, false, 0)
            .clone();
    }

    let translation = screen_to_world(controller.position(), controller.screen_size(), PLAYER_Z);
    info!(
        "Spawning player '{}' at ({}, {})",
        controller.name,
        controller.position().x,
        controller.position().y
    );

    commands.spawn((
        Player,
        controller,
        PlayerSpriteFrame::default(),
        sprite,
        Transform::from_translation(translation),
        Visibility::default(),
    ));
}
