//! Sprite transform demo.
//!
//! Directions move the sprite, Key0 / Key1 rotate it, Key2 / Key3 scale
//! it and the rotary knob rotates in fixed steps. Pressing the rotary
//! button resets everything.

use std::f64::consts::PI;

use pixtick_input::KeyEvents;
use pixtick_render::{Bitmap, GeoM, Screen};
use pixtick_runtime::{Game, GameError};
use pixtick_types::LogicalKey;

const SPRITE: &[&str] = &[
    "...##...",
    "..####..",
    ".######.",
    "########",
    "...##...",
    "...##...",
    "...##...",
    "...##...",
];

const MOVE_STEP: f64 = 1.0;
const TURN_STEP: f64 = PI / 32.0;
const KNOB_STEP: f64 = PI / 8.0;
const SCALE_STEP: f64 = 1.05;
const MIN_SCALE: f64 = 0.25;
const MAX_SCALE: f64 = 6.0;

pub struct GeomDemo {
    sprite: Bitmap,
    x: f64,
    y: f64,
    angle: f64,
    scale: f64,
    bounds: (f64, f64),
}

impl GeomDemo {
    pub fn new() -> Self {
        let mut demo = Self {
            sprite: Bitmap::from_rows(SPRITE),
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            scale: 1.0,
            bounds: (128.0, 64.0),
        };
        demo.reset();
        demo
    }

    fn reset(&mut self) {
        self.x = self.bounds.0 / 2.0;
        self.y = self.bounds.1 / 2.0;
        self.angle = 0.0;
        self.scale = 2.0;
    }

    /// Sprite transform: center on the origin, scale, rotate, then move.
    pub fn transform(&self) -> GeoM {
        let half_w = f64::from(self.sprite.width()) / 2.0;
        let half_h = f64::from(self.sprite.height()) / 2.0;
        GeoM::new()
            .translate(-half_w, -half_h)
            .scale(self.scale, self.scale)
            .rotate(self.angle)
            .translate(self.x, self.y)
    }
}

impl Default for GeomDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for GeomDemo {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        if keys.is_just_pressed(LogicalKey::RotaryButton) {
            self.reset();
            return Ok(());
        }

        if keys.is_pressed(LogicalKey::Left) {
            self.x -= MOVE_STEP;
        }
        if keys.is_pressed(LogicalKey::Right) {
            self.x += MOVE_STEP;
        }
        if keys.is_pressed(LogicalKey::Up) {
            self.y -= MOVE_STEP;
        }
        if keys.is_pressed(LogicalKey::Down) {
            self.y += MOVE_STEP;
        }
        self.x = self.x.clamp(0.0, self.bounds.0);
        self.y = self.y.clamp(0.0, self.bounds.1);

        if keys.is_pressed(LogicalKey::Key0) {
            self.angle -= TURN_STEP;
        }
        if keys.is_pressed(LogicalKey::Key1) {
            self.angle += TURN_STEP;
        }
        if keys.is_just_pressed(LogicalKey::RotaryLeft) {
            self.angle -= KNOB_STEP;
        }
        if keys.is_just_pressed(LogicalKey::RotaryRight) {
            self.angle += KNOB_STEP;
        }
        self.angle = self.angle.rem_euclid(2.0 * PI);

        if keys.is_pressed(LogicalKey::Key2) {
            self.scale *= SCALE_STEP;
        }
        if keys.is_pressed(LogicalKey::Key3) {
            self.scale /= SCALE_STEP;
        }
        self.scale = self.scale.clamp(MIN_SCALE, MAX_SCALE);
        Ok(())
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        let options = screen.options(self.transform());
        screen.draw_image(&self.sprite, &options);
        screen.println(format!(
            "{:.0},{:.0} {:.0}deg x{:.1}",
            self.x,
            self.y,
            self.angle.to_degrees(),
            self.scale
        ));
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        self.bounds = (f64::from(outside_width), f64::from(outside_height));
        self.reset();
        (outside_width, outside_height)
    }
}
