//! The interface games implement.

use pixtick_input::KeyEvents;
use pixtick_render::Screen;

use crate::error::GameError;

/// A game driven by [`crate::Runtime`].
pub trait Game {
    /// Advance game state by one tick.
    ///
    /// Returning [`GameError::Termination`] ends the run cleanly; `draw`
    /// is not called for that tick.
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError>;

    /// Render the current state onto a cleared frame.
    fn draw(&mut self, screen: &mut Screen<'_>);

    /// Logical screen size for a display of `outside_width` by
    /// `outside_height` pixels. Called once before the first tick.
    ///
    /// `draw` gets a [`Screen`] of this size anchored at the top-left of
    /// the display, clamped to the display's size.
    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        (outside_width, outside_height)
    }
}

impl<G: Game + ?Sized> Game for &mut G {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        (**self).update(keys)
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        (**self).draw(screen);
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        (**self).layout(outside_width, outside_height)
    }
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        (**self).update(keys)
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        (**self).draw(screen);
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        (**self).layout(outside_width, outside_height)
    }
}
