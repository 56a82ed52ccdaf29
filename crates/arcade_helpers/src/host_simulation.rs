use bevy::prelude::*;

use crate::{GAME_MESSAGE_QUEUE, GameMessage, HOST_MESSAGE_QUEUE, HostMessage};

/// Stands in for the host page on native builds:
/// `S` and `R` play the page's Start and Restart buttons and outgoing messages are logged.
pub struct HostSimulation;

impl Plugin for HostSimulation {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (simulate_page_buttons, log_game_messages));
    }
}

fn page_button(keycode: &ButtonInput<KeyCode>) -> Option<HostMessage> {
    if keycode.just_pressed(KeyCode::KeyS) {
        Some(HostMessage::Start)
    } else if keycode.just_pressed(KeyCode::KeyR) {
        Some(HostMessage::Restart)
    } else {
        None
    }
}

fn simulate_page_buttons(keycode: Res<ButtonInput<KeyCode>>) {
    if let Some(message) = page_button(&keycode) {
        HOST_MESSAGE_QUEUE.lock().push(message);
    }
}

fn log_game_messages() {
    let messages: Vec<GameMessage> = GAME_MESSAGE_QUEUE.lock().drain(..).collect();
    for message in messages {
        match message {
            // Sent every second, too noisy for info
            GameMessage::Time { seconds } => debug!("Host <- time {seconds}"),
            message => info!("Host <- {message:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_page_buttons() {
        let mut keycode = ButtonInput::<KeyCode>::default();
        assert_eq!(page_button(&keycode), None);

        keycode.press(KeyCode::KeyS);
        assert_eq!(page_button(&keycode), Some(HostMessage::Start));

        keycode.clear();
        keycode.press(KeyCode::KeyR);
        assert_eq!(page_button(&keycode), Some(HostMessage::Restart));

        keycode.clear();
        keycode.press(KeyCode::Space);
        assert_eq!(page_button(&keycode), None);
    }
}
