use bevy::prelude::*;
use bevy_asset_loader::prelude::*;

use crate::core::AssetState;

#[derive(AssetCollection, Resource)]
pub struct GameAssets {
    #[asset(path = "images/bg.png")]
    pub background: Handle<Image>,
    #[asset(path = "images/basket.png")]
    pub basket: Handle<Image>,
    #[asset(path = "images/apple.png")]
    pub apple: Handle<Image>,
    #[asset(path = "images/money.png")]
    pub money: Handle<Image>,
    #[asset(path = "audio/bgMusic.ogg")]
    pub music: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/catchSound.ogg")]
    pub catch_sound: Handle<bevy_kira_audio::prelude::AudioSource>,
}

pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AssetState>()
            .add_loading_state(
                LoadingState::new(AssetState::Loading)
                    .continue_to_state(AssetState::Loaded)
                    .load_collection::<GameAssets>(),
            )
            .add_systems(OnEnter(AssetState::Loaded), log_loaded);
    }
}

fn log_loaded() {
    info!("Game assets loaded");
}
