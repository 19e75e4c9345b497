use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use dayspring::config::{ConfigPlugin, GameSettings};
use dayspring::input::InputPlugin;
use dayspring::player::PlayerPlugin;
use dayspring::save::SavePlugin;
use dayspring::shared::*;
use dayspring::ui::UiPlugin;

fn main() {
    let mut app = App::new();

    // Settings first: the window size and save directory come from them.
    app.add_plugins(ConfigPlugin);
    let screen = app.world().resource::<GameSettings>().screen_size();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Dayspring".into(),
                    resolution: WindowResolution::new(screen.x, screen.y),
                    present_mode: PresentMode::AutoVsync,
                    resizable: false,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    // Game state
    .init_state::<GameState>()
    // Shared resources
    .init_resource::<Metrics>()
    .init_resource::<CurrentScene>()
    // Events
    .add_event::<InteractionEvent>()
    .add_event::<SceneChangeEvent>()
    // Domain plugins
    .add_plugins(InputPlugin)
    .add_plugins(PlayerPlugin)
    .add_plugins(SavePlugin)
    .add_plugins(UiPlugin)
    // Camera
    .add_systems(Startup, setup_camera)
    .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
