//! Shape and text primitives.

use pixtick_input::KeyEvents;
use pixtick_render::Screen;
use pixtick_runtime::{Game, GameError};
use pixtick_types::{Color, LogicalKey};

const CURSOR_RADIUS: u32 = 3;

pub struct DrawingDemo {
    cursor: (i32, i32),
    bounds: (i32, i32),
    filled: bool,
    held: u32,
    tick: u64,
}

impl DrawingDemo {
    pub fn new() -> Self {
        Self {
            cursor: (64, 40),
            bounds: (128, 64),
            filled: false,
            held: 0,
            tick: 0,
        }
    }
}

impl Default for DrawingDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for DrawingDemo {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        self.tick = keys.tick();
        let (mut x, mut y) = self.cursor;
        if keys.is_pressed(LogicalKey::Left) {
            x -= 1;
        }
        if keys.is_pressed(LogicalKey::Right) {
            x += 1;
        }
        if keys.is_pressed(LogicalKey::Up) {
            y -= 1;
        }
        if keys.is_pressed(LogicalKey::Down) {
            y += 1;
        }
        self.cursor = (x.clamp(0, self.bounds.0 - 1), y.clamp(0, self.bounds.1 - 1));

        if keys.is_just_pressed(LogicalKey::Key0) {
            self.filled = !self.filled;
        }
        self.held = keys.hold_duration(LogicalKey::Key1);
        Ok(())
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        let size = screen.size();
        let bottom = size.height_i32() - 1;

        screen.println("primitives");
        screen.println(format!("hold {}", self.held));
        let counter = format!("{:>5}", self.tick);
        screen.text(size.width_i32() - 30, 8, &counter, Color::White);

        let corners = ((40, bottom - 2), (52, bottom - 2), (46, bottom - 14));
        if self.filled {
            screen.fill_rect(4, bottom - 14, 12, 12, Color::White);
            screen.fill_circle(28, bottom - 8, 6, Color::White);
            screen.fill_triangle(corners.0, corners.1, corners.2, Color::White);
        } else {
            screen.rect(4, bottom - 14, 12, 12, Color::White);
            screen.circle(28, bottom - 8, 6, Color::White);
            screen.triangle(corners.0, corners.1, corners.2, Color::White);
        }
        screen.line(0, 20, size.width_i32() - 1, 20, Color::White);

        let (cx, cy) = self.cursor;
        screen.circle(cx, cy, CURSOR_RADIUS, Color::White);
        screen.set_pixel(cx, cy, Color::White);
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX).max(1);
        self.bounds = (clamp(outside_width), clamp(outside_height));
        self.cursor = (self.bounds.0 / 2, self.bounds.1 * 5 / 8);
        (outside_width, outside_height)
    }
}
