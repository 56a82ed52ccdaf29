use arcade_helpers::restart::{RestartRequested, StartRequested};
use arcade_helpers::{GameMessage, HostMessageHandler, report};
use bevy::prelude::*;

use crate::core::{GameEnded, RoundSet, ScoreChanged, TimeChanged};

#[derive(Default, Clone, Copy)]
pub struct AppleCatcher;

impl HostMessageHandler for AppleCatcher {
    fn start(world: &mut World) {
        info!("Host started AppleCatcher");
        world.send_event(StartRequested);
    }

    fn restart(world: &mut World) {
        info!("Host restarted AppleCatcher");
        world.send_event(RestartRequested);
    }
}

/// Mirrors score, time and outcome to the host page.
pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, report_to_host.in_set(RoundSet::Present));
    }
}

fn report_to_host(
    mut score_changed: EventReader<ScoreChanged>,
    mut time_changed: EventReader<TimeChanged>,
    mut game_ended: EventReader<GameEnded>,
) {
    for ScoreChanged(score) in score_changed.read() {
        report(GameMessage::Score { score: *score });
    }
    for TimeChanged(seconds) in time_changed.read() {
        report(GameMessage::Time { seconds: *seconds });
    }
    for GameEnded(outcome) in game_ended.read() {
        report(GameMessage::Outcome {
            win: outcome.win,
            score: outcome.final_score,
        });
    }
}
