use bevy::prelude::*;
use bevy::state::state::FreelyMutableState;

#[derive(Component)]
pub struct StartButton;

#[derive(Component)]
pub struct RestartButton;

/// The player asked to begin playing from the start screen.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequested;

/// The player asked to throw the current round away and play a fresh one.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartRequested;

pub struct RestartPlugin;

impl Plugin for RestartPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StartRequested>()
            .add_event::<RestartRequested>()
            .add_systems(PreUpdate, forward_button_presses);
    }
}

pub trait Restartable: Resource {
    type State: States + FreelyMutableState;

    fn restart(&mut self);
    fn restarted_state() -> Self::State;
}

fn forward_button_presses(
    start_query: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    restart_query: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    mut start_requested: EventWriter<StartRequested>,
    mut restart_requested: EventWriter<RestartRequested>,
) {
    if start_query.iter().any(|i| *i == Interaction::Pressed) {
        start_requested.send(StartRequested);
    }
    if restart_query.iter().any(|i| *i == Interaction::Pressed) {
        restart_requested.send(RestartRequested);
    }
}

/// Restarts `T` once per frame no matter how many restart requests arrived.
pub fn handle_restart<T: Restartable>(
    mut requests: EventReader<RestartRequested>,
    mut next_state: ResMut<NextState<T::State>>,
    mut restartable: ResMut<T>,
) {
    if requests.read().count() == 0 {
        return;
    }

    restartable.restart();
    next_state.set(T::restarted_state());
}
