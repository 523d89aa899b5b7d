//! Snake, as a closed set of scenes.

use std::collections::VecDeque;

use pixtick_input::KeyEvents;
use pixtick_render::Screen;
use pixtick_runtime::{Game, GameError};
use pixtick_types::{Color, LogicalKey};
use rand::Rng;

/// Cell size in pixels.
const CELL: u32 = 4;
/// Ticks per snake step.
const STEP_TICKS: u32 = 4;
const START_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Left,
    Right,
    Up,
    Down,
}

impl Heading {
    fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }

    fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    fn from_keys(keys: &KeyEvents) -> Option<Self> {
        [
            (LogicalKey::Left, Self::Left),
            (LogicalKey::Right, Self::Right),
            (LogicalKey::Up, Self::Up),
            (LogicalKey::Down, Self::Down),
        ]
        .into_iter()
        .find(|(key, _)| keys.is_just_pressed(*key))
        .map(|(_, heading)| heading)
    }
}

#[derive(Debug, Clone)]
struct Round {
    body: VecDeque<(i32, i32)>,
    heading: Heading,
    queued: Heading,
    food: (i32, i32),
    score: u32,
    wait: u32,
}

#[derive(Debug, Clone)]
enum Scene {
    Title,
    Playing(Round),
    GameOver { score: u32 },
}

pub struct SnakeGame<R> {
    rng: R,
    scene: Scene,
    grid: (i32, i32),
    best: u32,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            scene: Scene::Title,
            grid: (128 / CELL as i32, 64 / CELL as i32),
            best: 0,
        }
    }

    fn start_round(&mut self) -> Round {
        let (w, h) = self.grid;
        let head = (w / 2, h / 2);
        let body = (0..START_LENGTH as i32)
            .map(|i| (head.0 - i, head.1))
            .collect();
        let mut round = Round {
            body,
            heading: Heading::Right,
            queued: Heading::Right,
            food: (0, 0),
            score: 0,
            wait: STEP_TICKS,
        };
        round.food = self.place_food(&round.body);
        round
    }

    fn place_food(&mut self, body: &VecDeque<(i32, i32)>) -> (i32, i32) {
        let (w, h) = self.grid;
        let free = usize::try_from(w * h).unwrap_or(0).saturating_sub(body.len());
        if free == 0 {
            return body.front().copied().unwrap_or((0, 0));
        }
        let mut nth = self.rng.gen_range(0..free);
        for y in 0..h {
            for x in 0..w {
                if body.contains(&(x, y)) {
                    continue;
                }
                if nth == 0 {
                    return (x, y);
                }
                nth -= 1;
            }
        }
        (0, 0)
    }

    /// Advance a round by one tick; `None` when the snake died.
    fn step(&mut self, mut round: Round, keys: &KeyEvents) -> Option<Round> {
        if let Some(heading) = Heading::from_keys(keys) {
            if heading != round.heading.opposite() {
                round.queued = heading;
            }
        }

        round.wait -= 1;
        if round.wait > 0 {
            return Some(round);
        }
        round.wait = STEP_TICKS;
        round.heading = round.queued;

        let (dx, dy) = round.heading.delta();
        let head = round.body.front().copied()?;
        let next = (head.0 + dx, head.1 + dy);
        let (w, h) = self.grid;
        let eats = next == round.food;
        if !eats {
            round.body.pop_back();
        }
        let hits_wall = next.0 < 0 || next.1 < 0 || next.0 >= w || next.1 >= h;
        if hits_wall || round.body.contains(&next) {
            return None;
        }
        round.body.push_front(next);
        if eats {
            round.score += 1;
            round.food = self.place_food(&round.body);
        }
        Some(round)
    }
}

impl<R: Rng> Game for SnakeGame<R> {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        let scene = std::mem::replace(&mut self.scene, Scene::Title);
        self.scene = match scene {
            Scene::Title => {
                if keys.is_just_pressed(LogicalKey::Key0) {
                    Scene::Playing(self.start_round())
                } else {
                    Scene::Title
                }
            }
            Scene::Playing(round) => {
                let score = round.score;
                match self.step(round, keys) {
                    Some(round) => Scene::Playing(round),
                    None => {
                        self.best = self.best.max(score);
                        Scene::GameOver { score }
                    }
                }
            }
            Scene::GameOver { score } => {
                if keys.is_just_pressed(LogicalKey::Key0) {
                    Scene::Title
                } else {
                    Scene::GameOver { score }
                }
            }
        };
        Ok(())
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        match &self.scene {
            Scene::Title => {
                screen.println("SNAKE");
                screen.println("Key0 to start");
                if self.best > 0 {
                    screen.println(format!("Best {}", self.best));
                }
            }
            Scene::Playing(round) => {
                let size = screen.size();
                screen.rect(0, 0, size.width, size.height, Color::White);
                for &(x, y) in &round.body {
                    let (px, py) = cell_origin(x, y);
                    screen.fill_rect(px, py, CELL, CELL, Color::White);
                }
                let (fx, fy) = cell_origin(round.food.0, round.food.1);
                let r = CELL / 2;
                let half = r as i32;
                screen.circle(fx + half, fy + half, r - 1, Color::White);
            }
            Scene::GameOver { score } => {
                screen.println("Game Over");
                screen.println(format!("Score {score}"));
                screen.println("Key0 to continue");
            }
        }
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        let cells = |px: u32| {
            i32::try_from(px / CELL)
                .unwrap_or(i32::MAX)
                .max(START_LENGTH as i32 + 1)
        };
        self.grid = (cells(outside_width), cells(outside_height));
        (outside_width, outside_height)
    }
}

fn cell_origin(x: i32, y: i32) -> (i32, i32) {
    let cell = CELL as i32;
    (x * cell, y * cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::testing::{render, Keys};
    use pixtick_types::Size;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> SnakeGame<StdRng> {
        let mut game = SnakeGame::new(StdRng::seed_from_u64(7));
        game.layout(128, 64);
        game
    }

    fn playing(game: &SnakeGame<StdRng>) -> &Round {
        match &game.scene {
            Scene::Playing(round) => round,
            other => panic!("expected a round, got {other:?}"),
        }
    }

    #[test]
    fn key0_starts_a_round() {
        let mut game = game();
        let mut keys = Keys::new();
        game.update(&keys.tick(&[])).unwrap();
        assert!(matches!(game.scene, Scene::Title));
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        let round = playing(&game);
        assert_eq!(round.body.len(), START_LENGTH);
        assert!(!round.body.contains(&round.food));
    }

    #[test]
    fn snake_steps_every_few_ticks() {
        let mut game = game();
        let mut keys = Keys::new();
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        let start = playing(&game).body[0];
        for _ in 0..STEP_TICKS {
            game.update(&keys.tick(&[])).unwrap();
        }
        assert_eq!(playing(&game).body[0], (start.0 + 1, start.1));
    }

    #[test]
    fn reversing_is_ignored() {
        let mut game = game();
        let mut keys = Keys::new();
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        game.update(&keys.tick(&[LogicalKey::Left])).unwrap();
        assert_eq!(playing(&game).queued, Heading::Right);
        game.update(&keys.tick(&[])).unwrap();
        game.update(&keys.tick(&[LogicalKey::Up])).unwrap();
        assert_eq!(playing(&game).queued, Heading::Up);
    }

    #[test]
    fn hitting_the_wall_ends_the_round() {
        let mut game = game();
        let mut keys = Keys::new();
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        // Heading right from the middle of a 32-wide grid.
        for _ in 0..(20 * STEP_TICKS) {
            game.update(&keys.tick(&[])).unwrap();
            if matches!(game.scene, Scene::GameOver { .. }) {
                break;
            }
        }
        assert!(matches!(game.scene, Scene::GameOver { .. }));
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        assert!(matches!(game.scene, Scene::Title));
    }

    #[test]
    fn eating_grows_the_snake() {
        let mut game = game();
        let mut keys = Keys::new();
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        if let Scene::Playing(round) = &mut game.scene {
            let head = round.body[0];
            round.food = (head.0 + 1, head.1);
        }
        for _ in 0..STEP_TICKS {
            game.update(&keys.tick(&[])).unwrap();
        }
        let round = playing(&game);
        assert_eq!(round.score, 1);
        assert_eq!(round.body.len(), START_LENGTH + 1);
    }

    #[test]
    fn draws_each_scene() {
        let mut game = game();
        assert!(render(&mut game, Size::new(128, 64)).count_set() > 0);
        let mut keys = Keys::new();
        game.update(&keys.tick(&[LogicalKey::Key0])).unwrap();
        let frame = render(&mut game, Size::new(128, 64));
        let (hx, hy) = playing(&game).body[0];
        assert!(frame.get(hx * CELL as i32, hy * CELL as i32));
    }
}
