//! Bundled demo games.

use clap::ValueEnum;
use pixtick_input::KeyEvents;
use pixtick_render::Screen;
use pixtick_runtime::{Game, GameError};

use crate::term::QuitSignal;

pub mod drawing;
pub mod geom;
pub mod snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Move, scale and rotate a sprite.
    Geom,
    /// Classic snake.
    Snake,
    /// Shape and text primitives.
    Drawing,
}

impl DemoKind {
    pub fn build(self) -> Box<dyn Game> {
        match self {
            Self::Geom => Box::new(geom::GeomDemo::new()),
            Self::Snake => Box::new(snake::SnakeGame::new(rand::thread_rng())),
            Self::Drawing => Box::new(drawing::DrawingDemo::new()),
        }
    }
}

/// Ends the wrapped game once the quit key is pressed.
pub struct Quittable<G> {
    game: G,
    quit: QuitSignal,
}

impl<G: Game> Quittable<G> {
    pub fn new(game: G, quit: QuitSignal) -> Self {
        Self { game, quit }
    }
}

impl<G: Game> Game for Quittable<G> {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        if self.quit.is_requested() {
            return Err(GameError::Termination);
        }
        self.game.update(keys)
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        self.game.draw(screen);
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        self.game.layout(outside_width, outside_height)
    }
}
