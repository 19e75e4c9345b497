use bevy::core::FrameCount;
use bevy::prelude::*;
use crate::shared::*;
use super::animation::current_frame;
use super::spawn::{PlayerAnimations, PlayerSpriteFrame};
use super::{screen_to_world, PlayerController, PLAYER_Z};

/// Core movement system: hands this frame's held keys and every world
/// object to the controller, which filters each key through the collision
/// checks and commits whatever is left.
pub fn player_movement(
    input: Res<PlayerInput>,
    objects: Query<&WorldObject>,
    mut query: Query<&mut PlayerController, With<Player>>,
) {
    let Ok(mut controller) = query.get_single_mut() else {
        return;
    };

    let objects: Vec<&WorldObject> = objects.iter().collect();
    // Idle frames must not trip `Changed<PlayerController>`.
    if controller.bypass_change_detection().move_player(&input, &objects) {
        controller.set_changed();
    }
}

/// Picks the walk-cycle frame from facing, movement and the global frame
/// count, and swaps the sprite image when it changed.
pub fn animate_player_sprite(
    frame_count: Res<FrameCount>,
    animations: Option<Res<PlayerAnimations>>,
    mut query: Query<(&PlayerController, &mut PlayerSpriteFrame, &mut Sprite), With<Player>>,
) {
    for (controller, mut frame, mut sprite) in &mut query {
        let index = current_frame(controller.facing, controller.is_moving, frame_count.0);
        if frame.0 != index {
            frame.0 = index;
        }

        let Some(animations) = &animations else {
            continue;
        };
        let image = animations.0.sprite(
            controller.gender,
            controller.facing,
            controller.is_moving,
            frame_count.0,
        );
        if sprite.image != *image {
            sprite.image = image.clone();
        }
    }
}

/// Mirror the screen-space position into the render transform.
pub fn sync_player_transform(
    mut query: Query<(&PlayerController, &mut Transform), (With<Player>, Changed<PlayerController>)>,
) {
    for (controller, mut transform) in &mut query {
        transform.translation =
            screen_to_world(controller.position(), controller.screen_size(), PLAYER_Z);
    }
}
