use arcade_helpers::overlay::{OverlayLine, despawn_overlay, spawn_overlay};
use arcade_helpers::restart::{RestartButton, StartButton, StartRequested};
use bevy::prelude::*;

use crate::core::config::{ENCOURAGING_SCORE, ROUND_SECS, WIN_THRESHOLD};
use crate::core::{AssetState, CosmeticRng, GameEnded, RoundSet, Screen};
use crate::round::announce_round;
use crate::session::{GameSession, Outcome};

const AMBIENT_PARTICLES: usize = 15;

const WIN_COLOR: Color = Color::srgb(0.3, 0.85, 0.35);
const LOSE_COLOR: Color = Color::srgb(0.95, 0.3, 0.3);

#[derive(Component)]
struct StartScreen;

#[derive(Component)]
struct EndScreen;

/// Dot drifting upward behind the start screen, wrapping around at the top.
#[derive(Component)]
struct AmbientParticle {
    timer: Timer,
    start_top: f32,
}

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CosmeticRng>()
            .add_systems(OnEnter(Screen::Start), spawn_start_screen)
            .add_systems(OnExit(Screen::Start), despawn_overlay::<StartScreen>)
            .add_systems(OnEnter(Screen::End), spawn_end_screen)
            .add_systems(OnExit(Screen::End), despawn_overlay::<EndScreen>)
            .add_systems(
                Update,
                (
                    start_shortcuts.run_if(in_state(Screen::Start)),
                    handle_start_requests
                        .after(start_shortcuts)
                        .before(announce_round)
                        .run_if(in_state(AssetState::Loaded)),
                )
                    .in_set(RoundSet::Control),
            )
            .add_systems(
                Update,
                (
                    show_end_screen.in_set(RoundSet::Present),
                    drift_ambient_particles.run_if(in_state(Screen::Start)),
                ),
            );
    }
}

/// Message tier on the end screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Champion,
    NearMiss,
    KeepTrying,
}

impl Verdict {
    pub const fn of(outcome: &Outcome) -> Self {
        if outcome.win {
            Self::Champion
        } else if outcome.final_score >= ENCOURAGING_SCORE {
            Self::NearMiss
        } else {
            Self::KeepTrying
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Champion => "WIN!",
            Self::NearMiss | Self::KeepTrying => "LOSE",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Champion => "Excellent job! You're an apple catching champion!",
            Self::NearMiss => "Not bad! Keep practicing to catch more than 10 apples!",
            Self::KeepTrying => "Don't give up! Try again to improve your score!",
        }
    }

    const fn color(self) -> Color {
        match self {
            Self::Champion => WIN_COLOR,
            Self::NearMiss | Self::KeepTrying => LOSE_COLOR,
        }
    }
}

fn spawn_start_screen(mut commands: Commands, mut rng: ResMut<CosmeticRng>) {
    spawn_overlay(
        &mut commands,
        StartScreen,
        vec![
            OverlayLine::new("Apple Catcher", 48.0),
            OverlayLine::new(
                format!("Catch as many apples as you can in {ROUND_SECS} seconds!"),
                20.0,
            ),
            OverlayLine::new(
                format!("Catch more than {WIN_THRESHOLD} to win. Move with the arrow keys."),
                18.0,
            ),
        ],
        "Start",
        StartButton,
    );

    for _ in 0..AMBIENT_PARTICLES {
        let size = rng.f32().mul_add(4.0, 2.0);
        let start_top = rng.f32() * 100.0;
        let mut timer = Timer::from_seconds(rng.f32().mul_add(3.0, 3.0), TimerMode::Repeating);
        timer.set_elapsed(timer.duration().mul_f32(rng.f32()));

        commands.spawn((
            StartScreen,
            AmbientParticle { timer, start_top },
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(size),
                height: Val::Px(size),
                left: Val::Percent(rng.f32() * 100.0),
                top: Val::Percent(start_top),
                ..default()
            },
            BorderRadius::MAX,
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            GlobalZIndex(-1),
        ));
    }
}

fn drift_ambient_particles(time: Res<Time>, mut query: Query<(&mut Node, &mut AmbientParticle)>) {
    for (mut node, mut particle) in &mut query {
        particle.timer.tick(time.delta());
        let top = (particle.start_top - particle.timer.fraction() * 100.0).rem_euclid(100.0);
        node.top = Val::Percent(top);
    }
}

fn spawn_end_screen(mut commands: Commands, session: Res<GameSession>) {
    let Some(outcome) = session.outcome() else {
        warn!("End screen without an outcome");
        return;
    };
    let verdict = Verdict::of(&outcome);

    spawn_overlay(
        &mut commands,
        EndScreen,
        vec![
            OverlayLine::new(verdict.headline(), 56.0).with_color(verdict.color()),
            OverlayLine::new(format!("Final score: {}", outcome.final_score), 32.0),
            OverlayLine::new(verdict.message(), 18.0),
        ],
        "Restart",
        RestartButton,
    );
}

fn start_shortcuts(keycode: Res<ButtonInput<KeyCode>>, mut start: EventWriter<StartRequested>) {
    if keycode.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        start.send(StartRequested);
    }
}

/// Start only leaves the start screen; an idle session begins its first round.
fn handle_start_requests(
    mut requests: EventReader<StartRequested>,
    screen: Res<State<Screen>>,
    mut session: ResMut<GameSession>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if *screen.get() != Screen::Start {
        debug!("Ignoring start on {:?}", screen.get());
        return;
    }

    if session.start() {
        next_screen.set(Screen::Game);
    }
}

/// Switches to the end screen, unless a restart already replaced the round that ended.
fn show_end_screen(
    mut game_ended: EventReader<GameEnded>,
    session: Res<GameSession>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    for GameEnded(outcome) in game_ended.read() {
        if session.outcome() == Some(*outcome) {
            next_screen.set(Screen::End);
        } else {
            debug!("Dropping stale outcome {outcome:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use arcade_helpers::restart::{RestartPlugin, RestartRequested};
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::round::RoundPlugin;
    use crate::session::Phase;

    fn app() -> App {
        seeded_app(fastrand::u64(..))
    }

    fn seeded_app(seed: u64) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, RestartPlugin))
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(CosmeticRng(fastrand::Rng::with_seed(seed)))
            .insert_state(AssetState::Loaded)
            .add_plugins((RoundPlugin, ScreenPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs(1)));
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .set_max_delta(Duration::from_secs(2));
        app.update();
        app
    }

    fn screen(app: &App) -> Screen {
        *app.world().resource::<State<Screen>>().get()
    }

    fn session(app: &App) -> &GameSession {
        app.world().resource::<GameSession>()
    }

    fn press_start(app: &mut App) {
        app.world_mut().send_event(StartRequested);
        app.update();
        app.update();
    }

    fn catch(app: &mut App, times: u32) {
        for _ in 0..times {
            app.world_mut()
                .resource_mut::<GameSession>()
                .on_target_caught();
        }
    }

    fn run_until(app: &mut App, wanted: Screen) {
        for _ in 0..(ROUND_SECS + 10) {
            if screen(app) == wanted {
                return;
            }
            app.update();
        }
        panic!("never reached {wanted:?}");
    }

    #[test]
    fn verdict_tiers() {
        assert_eq!(Verdict::of(&Outcome::judge(11, 10)), Verdict::Champion);
        assert_eq!(Verdict::of(&Outcome::judge(10, 10)), Verdict::NearMiss);
        assert_eq!(Verdict::of(&Outcome::judge(5, 10)), Verdict::NearMiss);
        assert_eq!(Verdict::of(&Outcome::judge(4, 10)), Verdict::KeepTrying);
        assert_eq!(Verdict::of(&Outcome::judge(0, 10)), Verdict::KeepTrying);
        assert_eq!(Verdict::NearMiss.headline(), Verdict::KeepTrying.headline());
    }

    fn ambient_layout(app: &mut App) -> Vec<(Val, Val)> {
        let mut query = app
            .world_mut()
            .query_filtered::<&Node, With<AmbientParticle>>();
        query
            .iter(app.world())
            .map(|node| (node.left, node.width))
            .collect()
    }

    #[test]
    fn ambient_particles_follow_the_cosmetic_seed() {
        let mut first = seeded_app(9);
        let mut second = seeded_app(9);

        let layout = ambient_layout(&mut first);
        assert_eq!(layout.len(), AMBIENT_PARTICLES);
        assert_eq!(layout, ambient_layout(&mut second));
    }

    #[test]
    fn opens_on_the_start_screen_with_an_idle_session() {
        let app = app();

        assert_eq!(screen(&app), Screen::Start);
        assert_eq!(session(&app).phase(), Phase::Idle);
    }

    #[test]
    fn start_waits_for_assets() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<NextState<AssetState>>()
            .set(AssetState::Loading);
        app.update();

        press_start(&mut app);

        assert_eq!(screen(&app), Screen::Start);
        assert_eq!(session(&app).phase(), Phase::Idle);
    }

    #[test]
    fn winning_round_ends_on_the_end_screen() {
        let mut app = app();
        press_start(&mut app);
        assert_eq!(screen(&app), Screen::Game);
        assert!(session(&app).is_running());

        catch(&mut app, 11);
        run_until(&mut app, Screen::End);

        assert_eq!(
            session(&app).outcome(),
            Some(Outcome {
                win: true,
                final_score: 11
            })
        );
    }

    #[test]
    fn low_score_gets_the_motivational_message() {
        let mut app = app();
        press_start(&mut app);

        catch(&mut app, 3);
        run_until(&mut app, Screen::End);

        let outcome = session(&app).outcome().unwrap();
        assert_eq!(
            outcome,
            Outcome {
                win: false,
                final_score: 3
            }
        );
        assert_eq!(Verdict::of(&outcome), Verdict::KeepTrying);
    }

    #[test]
    fn restart_mid_round_starts_over_without_an_outcome() {
        let mut app = app();
        press_start(&mut app);
        catch(&mut app, 4);
        for _ in 0..10 {
            app.update();
        }

        app.world_mut().send_event(RestartRequested);
        app.update();
        app.update();

        assert_eq!(screen(&app), Screen::Game);
        assert_eq!(session(&app).score(), 0);
        assert_eq!(session(&app).phase(), Phase::Running);
        assert_eq!(session(&app).outcome(), None);
        // Two frames have ticked since the restart
        assert_eq!(session(&app).remaining_whole_secs(), (ROUND_SECS - 2) as u32);
    }

    #[test]
    fn restart_from_the_end_screen_plays_again() {
        let mut app = app();
        press_start(&mut app);
        run_until(&mut app, Screen::End);

        app.world_mut().send_event(RestartRequested);
        run_until(&mut app, Screen::Game);

        assert!(session(&app).is_running());
        assert_eq!(session(&app).score(), 0);
        assert_eq!(session(&app).round(), 2);
    }

    #[test]
    fn start_is_ignored_once_playing() {
        let mut app = app();
        press_start(&mut app);
        catch(&mut app, 2);

        press_start(&mut app);

        assert_eq!(screen(&app), Screen::Game);
        assert_eq!(session(&app).score(), 2);
        assert_eq!(session(&app).round(), 1);
    }
}
