use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS — used to query and update HUD elements
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

/// Top-right metrics readout.
#[derive(Component)]
pub struct HudMetricsText;

#[derive(Component)]
pub struct PauseBanner;

/// The text shown in the readout, one stat per line.
pub fn metrics_readout(metrics: &Metrics) -> String {
    format!(
        "{}\nHappiness: {}\nHealth: {}\nFunds: {}",
        metrics.format_time(),
        metrics.happiness,
        metrics.health,
        metrics.format_funds()
    )
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN HUD
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands, metrics: Res<Metrics>) {
    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                right: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            // HUD must not block game clicks
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                HudMetricsText,
                Text::new(metrics_readout(&metrics)),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(JustifyText::Right),
            ));
        });
}

pub fn update_metrics_display(
    metrics: Res<Metrics>,
    mut query: Query<&mut Text, With<HudMetricsText>>,
) {
    if !metrics.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = metrics_readout(&metrics);
    }
}

pub fn spawn_pause_banner(mut commands: Commands) {
    commands.spawn((
        PauseBanner,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        GlobalZIndex(100),
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new("Paused"),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    });
}

pub fn despawn_pause_banner(mut commands: Commands, query: Query<Entity, With<PauseBanner>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_readout() {
        let readout = metrics_readout(&Metrics::default());
        assert_eq!(readout, "Day 1, 08:00\nHappiness: 15\nHealth: 10\nFunds: £0");
    }

    #[test]
    fn test_readout_tracks_changes() {
        let mut metrics = Metrics::default();
        metrics.change_metrics(-3.5, 2.0, 1.0);
        metrics.money = 2500.0;
        assert_eq!(
            metrics_readout(&metrics),
            "Day 1, 10:00\nHappiness: 11.5\nHealth: 11\nFunds: £2,500"
        );
    }
}
