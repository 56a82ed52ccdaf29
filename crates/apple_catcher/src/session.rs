use core::time::Duration;

use arcade_helpers::restart::Restartable;
use bevy::prelude::*;
use tracing::{debug, info};

use crate::core::{CatchSettings, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// Verdict of a finished round. Computed once when the countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub win: bool,
    pub final_score: u32,
}

impl Outcome {
    pub const fn judge(final_score: u32, win_threshold: u32) -> Self {
        Self {
            win: final_score > win_threshold,
            final_score,
        }
    }
}

/// Score, countdown and lifecycle of the game. One instance lives for the whole process and is
/// reset between rounds.
#[derive(Resource, Debug)]
pub struct GameSession {
    phase: Phase,
    score: u32,
    countdown: Timer,
    win_threshold: u32,
    outcome: Option<Outcome>,
    round: u32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::from_settings(&CatchSettings::default())
    }
}

impl GameSession {
    pub fn new(round_length: Duration, win_threshold: u32) -> Self {
        Self {
            phase: Phase::Idle,
            score: 0,
            countdown: Timer::new(round_length, TimerMode::Once),
            win_threshold,
            outcome: None,
            round: 0,
        }
    }

    pub fn from_settings(settings: &CatchSettings) -> Self {
        Self::new(settings.round_length, settings.win_threshold)
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Number of rounds started so far. Changes exactly when a new round begins.
    pub const fn round(&self) -> u32 {
        self.round
    }

    pub fn remaining_secs(&self) -> f32 {
        self.countdown.remaining_secs().max(0.0)
    }

    pub fn remaining_whole_secs(&self) -> u32 {
        self.remaining_secs().floor() as u32
    }

    /// Begins a round. Only an idle session can start; returns whether it did.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            debug!("Ignoring start while {}", self.phase);
            return false;
        }

        self.score = 0;
        self.outcome = None;
        self.countdown.reset();
        self.phase = Phase::Running;
        self.round += 1;
        info!(
            "Round {} started, {}s on the clock",
            self.round,
            self.remaining_whole_secs()
        );
        true
    }

    /// Advances the countdown. Returns the outcome on the frame the round ends.
    pub fn tick(&mut self, delta: Duration) -> Option<Outcome> {
        if !self.is_running() {
            return None;
        }

        self.countdown.tick(delta);
        if !self.countdown.finished() {
            return None;
        }

        let outcome = Outcome::judge(self.score, self.win_threshold);
        self.phase = Phase::Ended;
        self.outcome = Some(outcome);
        info!(
            "Round {} over with {} points, win: {}",
            self.round, outcome.final_score, outcome.win
        );
        Some(outcome)
    }

    /// Scores a catch. Returns the new score, or `None` when no round is running.
    pub fn on_target_caught(&mut self) -> Option<u32> {
        if !self.is_running() {
            debug!("Ignoring catch while {}", self.phase);
            return None;
        }

        self.score = self.score.saturating_add(1);
        Some(self.score)
    }

    /// Back to idle, dropping the pending countdown and any outcome.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.score = 0;
        self.outcome = None;
        self.countdown.reset();
    }
}

impl Restartable for GameSession {
    type State = Screen;

    fn restart(&mut self) {
        self.reset();
        self.start();
    }

    fn restarted_state() -> Screen {
        Screen::Game
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUND: Duration = Duration::from_secs(60);

    fn running() -> GameSession {
        let mut session = GameSession::default();
        assert!(session.start());
        session
    }

    fn catch(session: &mut GameSession, times: u32) {
        for _ in 0..times {
            session.on_target_caught();
        }
    }

    #[test]
    fn starts_idle_with_a_full_clock() {
        let session = GameSession::default();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining_whole_secs(), 60);
        assert_eq!(session.outcome(), None);
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn score_counts_catches_while_running_only() {
        let mut session = GameSession::default();
        assert_eq!(session.on_target_caught(), None);

        session.start();
        assert_eq!(session.on_target_caught(), Some(1));
        catch(&mut session, 6);
        assert_eq!(session.score(), 7);

        session.tick(ROUND);
        assert_eq!(session.on_target_caught(), None);
        assert_eq!(session.score(), 7);
    }

    #[test]
    fn tick_is_ignored_unless_running() {
        let mut session = GameSession::default();

        assert_eq!(session.tick(ROUND), None);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.remaining_whole_secs(), 60);
    }

    #[test]
    fn remaining_time_only_goes_down_and_rounds_down() {
        let mut session = running();
        let mut last = session.remaining_secs();

        for _ in 0..100 {
            session.tick(Duration::from_millis(250));
            assert!(session.remaining_secs() <= last);
            last = session.remaining_secs();
        }
        assert!((last - 35.0).abs() < 1e-3);

        session.tick(Duration::from_millis(100));
        assert_eq!(session.remaining_whole_secs(), 34);
    }

    #[test]
    fn outcome_is_computed_once_at_zero() {
        let mut session = running();
        catch(&mut session, 2);

        assert_eq!(session.tick(Duration::from_secs(59)), None);
        let outcome = session.tick(Duration::from_secs(5));
        assert_eq!(
            outcome,
            Some(Outcome {
                win: false,
                final_score: 2
            })
        );

        for _ in 0..3 {
            assert_eq!(session.tick(Duration::from_secs(1)), None);
            assert_eq!(session.phase(), Phase::Ended);
            assert_eq!(session.remaining_secs(), 0.0);
        }
        assert_eq!(session.outcome(), outcome);
    }

    #[test]
    fn ten_is_not_enough_to_win() {
        assert!(!Outcome::judge(10, 10).win);
        assert!(Outcome::judge(11, 10).win);
        assert!(!Outcome::judge(0, 10).win);
    }

    #[test]
    fn start_is_only_valid_from_idle() {
        let mut session = running();
        catch(&mut session, 3);

        assert!(!session.start());
        assert_eq!(session.score(), 3);
        assert_eq!(session.round(), 1);

        session.tick(ROUND);
        assert!(!session.start());
        assert_eq!(session.phase(), Phase::Ended);
    }

    #[test]
    fn restart_always_yields_a_fresh_running_round() {
        let mut idle = GameSession::default();
        let mut mid_round = running();
        catch(&mut mid_round, 4);
        mid_round.tick(Duration::from_secs(30));
        let mut ended = running();
        catch(&mut ended, 12);
        ended.tick(ROUND);

        for session in [&mut idle, &mut mid_round, &mut ended] {
            let round = session.round();
            Restartable::restart(session);

            assert_eq!(session.phase(), Phase::Running);
            assert_eq!(session.score(), 0);
            assert_eq!(session.remaining_whole_secs(), 60);
            assert_eq!(session.outcome(), None);
            assert_eq!(session.round(), round + 1);
        }
    }

    #[test]
    fn restart_cancels_the_pending_timeout() {
        let mut session = running();
        session.tick(Duration::from_millis(59_900));

        Restartable::restart(&mut session);
        assert_eq!(session.tick(Duration::from_millis(500)), None);
        assert!(session.is_running());
    }

    #[test]
    fn eleven_catches_win() {
        let mut session = running();
        catch(&mut session, 11);

        assert_eq!(
            session.tick(ROUND),
            Some(Outcome {
                win: true,
                final_score: 11
            })
        );
    }

    #[test]
    fn three_catches_lose() {
        let mut session = running();
        catch(&mut session, 3);

        assert_eq!(
            session.tick(ROUND),
            Some(Outcome {
                win: false,
                final_score: 3
            })
        );
    }

    #[test]
    fn restart_before_timeout_skips_the_outcome() {
        let mut session = running();
        catch(&mut session, 5);
        session.tick(Duration::from_secs(20));

        Restartable::restart(&mut session);

        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.outcome(), None);
    }
}
