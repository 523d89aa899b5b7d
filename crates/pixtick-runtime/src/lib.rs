//! Fixed-tick game loop for pixtick.
//!
//! A [`Runtime`] owns the input backend, the display (always behind a
//! [`pixtick_render::Rotated`] adapter) and the debounced key state, and
//! drives a [`Game`] through update, draw and present once per tick.

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod hardware;
pub mod runtime;
pub mod setup;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock, Ticker};
pub use config::Config;
pub use error::{GameError, RuntimeError};
pub use game::Game;
pub use hardware::{Devices, Hardware};
pub use runtime::{Outcome, RunReport, Runtime};
pub use state::LoopState;
