use arcade_helpers::restart::handle_restart;
use bevy::prelude::*;

use crate::core::{
    CatchSettings, GameEnded, RoundSet, RoundStarted, Screen, ScoreChanged, TargetCaught,
    TimeChanged,
};
use crate::session::GameSession;

/// Owns the session resource, the round events and the per-frame ordering.
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        let settings = CatchSettings::default();

        app.register_type::<CatchSettings>()
            .insert_resource(GameSession::from_settings(&settings))
            .insert_resource(settings)
            .init_state::<Screen>()
            .add_event::<ScoreChanged>()
            .add_event::<TimeChanged>()
            .add_event::<GameEnded>()
            .add_event::<TargetCaught>()
            .add_event::<RoundStarted>()
            .configure_sets(
                Update,
                (RoundSet::Control, RoundSet::Simulate, RoundSet::Present).chain(),
            )
            .add_systems(
                Update,
                (
                    handle_restart::<GameSession>,
                    announce_round.after(handle_restart::<GameSession>),
                )
                    .in_set(RoundSet::Control),
            )
            .add_systems(
                Update,
                advance_session
                    .in_set(RoundSet::Simulate)
                    .run_if(in_state(Screen::Game)),
            );
    }
}

/// Tells everyone a new round began and pushes its starting score and time.
pub fn announce_round(
    session: Res<GameSession>,
    mut last_round: Local<u32>,
    mut round_started: EventWriter<RoundStarted>,
    mut score_changed: EventWriter<ScoreChanged>,
    mut time_changed: EventWriter<TimeChanged>,
) {
    if session.round() == *last_round {
        return;
    }
    *last_round = session.round();

    round_started.send(RoundStarted {
        round: session.round(),
    });
    score_changed.send(ScoreChanged(session.score()));
    time_changed.send(TimeChanged(session.remaining_whole_secs()));
}

fn advance_session(
    time: Res<Time>,
    mut session: ResMut<GameSession>,
    mut time_changed: EventWriter<TimeChanged>,
    mut game_ended: EventWriter<GameEnded>,
) {
    if !session.is_running() {
        return;
    }

    let before = session.remaining_whole_secs();
    let outcome = session.tick(time.delta());

    let after = session.remaining_whole_secs();
    if after != before {
        time_changed.send(TimeChanged(after));
    }

    if let Some(outcome) = outcome {
        game_ended.send(GameEnded(outcome));
    }
}
