use bevy::prelude::*;
use crate::shared::*;
use super::PlayerController;

/// Interact with the nearest object in reach. Metrics are only written
/// when an interaction actually fires, so the HUD's change detection stays
/// quiet on idle frames.
pub fn player_interaction(
    input: Res<PlayerInput>,
    objects: Query<&WorldObject>,
    mut metrics: ResMut<Metrics>,
    mut query: Query<&mut PlayerController, With<Player>>,
    mut interaction_events: EventWriter<InteractionEvent>,
) {
    let Ok(mut controller) = query.get_single_mut() else {
        return;
    };

    let objects: Vec<&WorldObject> = objects.iter().collect();
    let nearby = controller.nearest_interactable(&objects);

    // The latch is bookkeeping only; it never needs a transform resync.
    let mut updated = *metrics;
    if let Some(effect) = controller
        .bypass_change_detection()
        .interact(&input, nearby, &mut updated)
    {
        *metrics = updated;
        let object_id = nearby.map(|obj| obj.id.clone()).unwrap_or_default();
        debug!(
            "Interacted with {}: happiness {:+}, time {:+}, health {:+}",
            object_id, effect.happiness, effect.time, effect.health
        );
        interaction_events.send(InteractionEvent { object_id, effect });
    }
}

/// Handle incoming `SceneChangeEvent`: record the new scene and put the
/// player back on the spawn point. The scene loader owns the objects.
pub fn handle_scene_change(
    mut events: EventReader<SceneChangeEvent>,
    mut current_scene: ResMut<CurrentScene>,
    mut query: Query<&mut PlayerController, With<Player>>,
) {
    // Process only the most recent change (in case multiple fire).
    let Some(ev) = events.read().last() else {
        return;
    };

    current_scene.screen = ev.screen.clone();
    current_scene.scene = ev.scene.clone();
    for mut controller in &mut query {
        controller.reset();
    }

    info!("Entered scene '{}' on screen '{}'", ev.scene, ev.screen);
}
