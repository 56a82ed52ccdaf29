use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::assets::GameAssets;
use crate::core::{AssetState, RoundSet, RoundStarted, Screen, TargetCaught};

/// Background track sits under the sound effects.
const MUSIC_VOLUME: f64 = 0.3;

/// Channel for the looping background track, so stopping it leaves sound effects alone.
#[derive(Resource)]
struct Music;

/// Instance of the track started by the latest round.
#[derive(Resource, Default)]
struct BackgroundMusic(Option<Handle<AudioInstance>>);

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .add_audio_channel::<Music>()
            .init_resource::<BackgroundMusic>()
            .add_systems(
                Update,
                (start_music, catch_audio)
                    .in_set(RoundSet::Present)
                    .run_if(in_state(AssetState::Loaded)),
            )
            .add_systems(OnEnter(Screen::End), stop_music);
    }
}

fn start_music(
    assets: Res<GameAssets>,
    music: Res<AudioChannel<Music>>,
    mut background: ResMut<BackgroundMusic>,
    mut round_started: EventReader<RoundStarted>,
) {
    if round_started.read().count() == 0 {
        return;
    }

    music.stop();
    let instance = music
        .play(assets.music.clone_weak())
        .looped()
        .with_volume(MUSIC_VOLUME)
        .handle();
    background.0 = Some(instance);
}

fn stop_music(music: Res<AudioChannel<Music>>) {
    music.stop();
}

fn catch_audio(
    assets: Res<GameAssets>,
    audio: Res<Audio>,
    mut target_caught: EventReader<TargetCaught>,
) {
    for _ in target_caught.read() {
        audio.play(assets.catch_sound.clone_weak());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<RoundStarted>()
            .insert_resource(AudioChannel::<Music>::default())
            .init_resource::<BackgroundMusic>()
            .insert_resource(GameAssets {
                background: Handle::default(),
                basket: Handle::default(),
                apple: Handle::default(),
                money: Handle::default(),
                music: Handle::default(),
                catch_sound: Handle::default(),
            })
            .add_systems(Update, start_music);
        app
    }

    fn queued_track(app: &App) -> Option<Handle<AudioInstance>> {
        app.world().resource::<BackgroundMusic>().0.clone()
    }

    #[test]
    fn each_round_queues_a_fresh_track() {
        let mut app = app();
        app.update();
        assert!(queued_track(&app).is_none());

        app.world_mut().send_event(RoundStarted { round: 1 });
        app.update();
        let first = queued_track(&app).unwrap();
        let music = app.world().resource::<AudioChannel<Music>>();
        assert_eq!(music.state(&first), PlaybackState::Queued);

        app.world_mut().send_event(RoundStarted { round: 2 });
        app.update();
        let second = queued_track(&app).unwrap();
        assert_ne!(first.id(), second.id());
    }
}
