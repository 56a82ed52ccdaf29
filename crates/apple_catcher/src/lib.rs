mod assets;
mod audio;
mod controls;
mod core;
mod effects;
mod host;
mod hud;
mod playfield;
mod round;
mod screen;
mod session;

use bevy::prelude::*;
use host::AppleCatcher;

/// Entry point for the game
pub fn run() {
    arcade_helpers::get_default_app::<AppleCatcher>("Apple Catcher")
        .add_plugins((
            assets::AssetsPlugin,
            audio::GameAudioPlugin,
            round::RoundPlugin,
            playfield::PlayfieldPlugin,
            screen::ScreenPlugin,
            hud::HudPlugin,
            effects::EffectsPlugin,
            host::HostPlugin,
        ))
        .add_systems(Startup, setup_camera)
        .run();
}

/// Sets up the main 2D camera
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
