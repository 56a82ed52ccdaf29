mod app;
pub use app::*;

pub mod floating_text;
pub mod input;
pub mod overlay;
pub mod restart;

mod host_bridge;
pub use host_bridge::*;

#[cfg(not(target_arch = "wasm32"))]
mod host_simulation;
#[cfg(not(target_arch = "wasm32"))]
pub use host_simulation::HostSimulation;
