//! Runtime and game errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("hardware initialisation failed: {0}")]
    HardwareInit(String),

    #[error("display error: {0}")]
    Present(#[from] pixtick_render::DisplayError),

    #[error("invalid layout: {0}")]
    Layout(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("game error: {0}")]
    Game(#[source] anyhow::Error),

    #[error("input error: {0}")]
    Input(#[from] pixtick_input::InputError),

    #[error("runtime has already finished")]
    Finished,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error returned from [`crate::Game::update`].
#[derive(Debug, Error)]
pub enum GameError {
    /// Stop the loop cleanly.
    #[error("game requested termination")]
    Termination,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
