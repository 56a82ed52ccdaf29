use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

/// Messages the host page can send to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    Start,
    Restart,
}

/// Messages the game reports to the host page so it can mirror the game state in its own DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage {
    Ready,
    Score { score: u32 },
    Time { seconds: u32 },
    Outcome { win: bool, score: u32 },
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Could not parse host message: {0}")]
    Parse(String),

    #[error("Could not serialize {0:?}")]
    Serialize(GameMessage),

    #[error("{0:?} not sent, parent window not found")]
    NoParentWindow(GameMessage),

    #[error("Could not post {message:?}: {reason}")]
    Post { message: GameMessage, reason: String },
}

pub static HOST_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<HostMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(not(target_arch = "wasm32"))]
pub static GAME_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<GameMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(target_arch = "wasm32")]
fn parse_host_message(value: JsValue) -> Result<HostMessage, BridgeError> {
    serde_wasm_bindgen::from_value(value).map_err(|err| BridgeError::Parse(err.to_string()))
}

#[cfg(target_arch = "wasm32")]
pub fn listen_host_messages() {
    let Some(window) = web_sys::window() else {
        error!("No global `window`, host messages disabled");
        return;
    };

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        match parse_host_message(event.data()) {
            Ok(message) => HOST_MESSAGE_QUEUE.lock().push(message),
            Err(err) => error!("{err}"),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to add message event listener: {err:?}");
        return;
    }

    closure.forget(); // Leaks memory, but ensures the closure lives for the lifetime of the program
}

#[cfg(not(target_arch = "wasm32"))]
pub fn send_game_message(message: GameMessage) -> Result<(), BridgeError> {
    GAME_MESSAGE_QUEUE.lock().push(message);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn send_game_message(message: GameMessage) -> Result<(), BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::NoParentWindow(message))?;
    let value =
        serde_wasm_bindgen::to_value(&message).map_err(|_| BridgeError::Serialize(message))?;

    let Ok(Some(parent_window)) = window.parent() else {
        return Err(BridgeError::NoParentWindow(message));
    };

    parent_window
        .post_message(&value, "*")
        .map_err(|err| BridgeError::Post {
            message,
            reason: format!("{err:?}"),
        })
}

/// Sends a message and logs it when it cannot be delivered. The game never depends on delivery.
pub fn report(message: GameMessage) {
    if let Err(err) = send_game_message(message) {
        error!("{err}");
    }
}

/// Reactions to the messages the host page can send.
///
/// Those functions are called by the bridge and are not meant to be called from the game itself.
pub trait HostMessageHandler: Send + Sync + Default + 'static {
    fn start(world: &mut World);
    fn restart(world: &mut World);
}

fn process_host_messages<T: HostMessageHandler>(world: &mut World) {
    let messages = HOST_MESSAGE_QUEUE.lock().drain(..).collect::<Vec<_>>();

    for message in messages {
        debug!("Host message {message:?}");
        match message {
            HostMessage::Start => T::start(world),
            HostMessage::Restart => T::restart(world),
        }
    }
}

fn ready() {
    report(GameMessage::Ready);
}

#[derive(Default)]
pub struct HostBridgePlugin<T: HostMessageHandler>(core::marker::PhantomData<T>);

impl<T: HostMessageHandler> Plugin for HostBridgePlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, process_host_messages::<T>);
        #[cfg(target_arch = "wasm32")]
        {
            app.add_systems(Startup, listen_host_messages);
        }
        app.add_systems(PostStartup, ready);
    }
}
