pub mod hud;

use bevy::prelude::*;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── HUD — metrics readout, always visible ───
        app.add_systems(Startup, hud::spawn_hud);
        app.add_systems(Update, hud::update_metrics_display);

        // ─── PAUSE ───
        app.add_systems(OnEnter(GameState::Paused), hud::spawn_pause_banner);
        app.add_systems(OnExit(GameState::Paused), hud::despawn_pause_banner);
        app.add_systems(Update, toggle_pause);
    }
}

/// Pause key flips between Playing and Paused.
pub fn toggle_pause(
    input: Res<PlayerInput>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.pause {
        return;
    }
    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
    }
}
