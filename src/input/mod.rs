use bevy::prelude::*;
use crate::config::KeyBindings;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>();
        app.add_systems(PreUpdate, reset_and_read_input);
    }
}

/// The single point where hardware input becomes game actions.
///
/// Held keys are pushed in a fixed order (up, down, left, right, interact)
/// so every consumer sees the same priority regardless of press order.
pub fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    let bound = [
        (GameKey::Up, bindings.move_up, Some(KeyCode::ArrowUp)),
        (GameKey::Down, bindings.move_down, Some(KeyCode::ArrowDown)),
        (GameKey::Left, bindings.move_left, Some(KeyCode::ArrowLeft)),
        (GameKey::Right, bindings.move_right, Some(KeyCode::ArrowRight)),
        (GameKey::Interact, bindings.interact, None),
    ];
    for (game_key, primary, mirror) in bound {
        let held = keys.pressed(primary) || mirror.is_some_and(|k| keys.pressed(k));
        if held {
            input.held.push(game_key);
        }
    }

    input.pause = keys.just_pressed(bindings.pause);
    input.quicksave = keys.just_pressed(bindings.quicksave);
    input.quickload = keys.just_pressed(bindings.quickload);
}
