//! Integration tests driving the full game loop on mock devices.

use std::time::Duration;

use pixtick_input::mock::{MockInput, MockInputHandle};
use pixtick_input::KeyEvents;
use pixtick_render::mock::{MockDisplay, MockDisplayHandle};
use pixtick_render::{DrawImageOptions, GeoM, Screen};
use pixtick_runtime::{
    Config, Devices, Game, GameError, Hardware, LoopState, ManualClock, Outcome, Runtime,
    RuntimeError,
};
use pixtick_types::{Color, KeySet, LogicalKey, Rotation, Size};
use tracing_subscriber::EnvFilter;

/// Mock devices plus the handles that observe them.
struct Rig {
    runtime: Runtime,
    input: MockInputHandle,
    display: MockDisplayHandle,
    clock: ManualClock,
}

fn rig(config: Config) -> Rig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();

    let input = MockInput::new();
    let display = MockDisplay::new(config.display_size());
    let input_handle = input.handle();
    let display_handle = display.handle();
    let clock = ManualClock::new();
    let runtime = Runtime::new(config, Devices::new(input, display))
        .unwrap()
        .with_clock(clock.clone());
    Rig {
        runtime,
        input: input_handle,
        display: display_handle,
        clock,
    }
}

/// Records what the loop did to it.
#[derive(Default)]
struct Recorder {
    updates: u64,
    draws: u64,
    terminate_on: Option<u64>,
    fail_on: Option<u64>,
    layout_seen: Option<(u32, u32)>,
    layout_result: Option<(u32, u32)>,
    events: Vec<KeyEvents>,
    on_update: Option<Box<dyn FnMut(u64)>>,
    pixel: Option<(i32, i32)>,
    screen_size: Option<Size>,
}

impl Game for Recorder {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        self.updates += 1;
        self.events.push(keys.clone());
        if let Some(hook) = self.on_update.as_mut() {
            hook(self.updates);
        }
        if self.fail_on == Some(self.updates) {
            return Err(anyhow::anyhow!("scripted failure").into());
        }
        if self.terminate_on == Some(self.updates) {
            return Err(GameError::Termination);
        }
        Ok(())
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        self.draws += 1;
        self.screen_size = Some(screen.size());
        if let Some((x, y)) = self.pixel {
            screen.set_pixel(x, y, Color::White);
        }
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        self.layout_seen = Some((outside_width, outside_height));
        self.layout_result.unwrap_or((outside_width, outside_height))
    }
}

#[test]
fn termination_skips_draw_on_its_tick() {
    let mut rig = rig(Config::default());
    let mut game = Recorder {
        terminate_on: Some(3),
        ..Recorder::default()
    };

    let report = rig.runtime.run(&mut game).unwrap();

    assert_eq!(report.outcome, Outcome::Terminated);
    assert_eq!(report.ticks, 3);
    assert_eq!(report.frames, 2);
    assert_eq!(game.updates, 3);
    assert_eq!(game.draws, 2);
    assert_eq!(rig.display.presents(), 2);
    assert_eq!(rig.display.clears(), 2);
    assert_eq!(rig.runtime.state(), LoopState::Terminated);
}

#[test]
fn finished_runtime_refuses_to_run_again() {
    let mut rig = rig(Config::default());
    let mut game = Recorder {
        terminate_on: Some(1),
        ..Recorder::default()
    };
    rig.runtime.run(&mut game).unwrap();
    assert!(matches!(
        rig.runtime.run(&mut game),
        Err(RuntimeError::Finished)
    ));
}

#[test]
fn present_failure_is_fatal() {
    let mut rig = rig(Config::default());
    rig.display.fail_on_present(2);
    let mut game = Recorder::default();

    let err = rig.runtime.run(&mut game).unwrap_err();

    assert!(matches!(err, RuntimeError::Present(_)));
    assert_eq!(game.updates, 2);
    assert_eq!(rig.display.frames().len(), 1);
    assert_eq!(rig.runtime.state(), LoopState::Errored);
}

#[test]
fn game_error_propagates() {
    let mut rig = rig(Config::default());
    let mut game = Recorder {
        fail_on: Some(2),
        ..Recorder::default()
    };

    let err = rig.runtime.run(&mut game).unwrap_err();

    assert!(matches!(err, RuntimeError::Game(_)));
    assert_eq!(game.draws, 1);
    assert_eq!(rig.runtime.state(), LoopState::Errored);
}

#[test]
fn zero_layout_is_rejected_before_the_first_tick() {
    let mut rig = rig(Config::default());
    let mut game = Recorder {
        layout_result: Some((0, 64)),
        ..Recorder::default()
    };

    let err = rig.runtime.run(&mut game).unwrap_err();

    assert!(matches!(err, RuntimeError::Layout(_)));
    assert_eq!(game.updates, 0);
    assert_eq!(rig.input.polls(), 0);
}

#[test]
fn tick_limit_stops_cleanly() {
    let mut config = Config::default();
    config.runtime.max_ticks = Some(5);
    let mut rig = rig(config);
    let mut game = Recorder::default();

    let report = rig.runtime.run(&mut game).unwrap();

    assert_eq!(report.outcome, Outcome::TickLimit);
    assert_eq!(report.ticks, 5);
    assert_eq!(rig.display.presents(), 5);
    assert_eq!(rig.clock_now(), Duration::from_millis(32 * 5));
    assert_eq!(report.late_ticks, 0);
}

#[test]
fn held_key_is_reported_after_debounce() {
    let mut rig = rig(Config::default());
    rig.input.press(LogicalKey::Key0);
    let mut game = Recorder {
        terminate_on: Some(4),
        ..Recorder::default()
    };

    rig.runtime.run(&mut game).unwrap();

    let firsts: Vec<bool> = game
        .events
        .iter()
        .map(|e| e.is_just_pressed(LogicalKey::Key0))
        .collect();
    assert_eq!(firsts, vec![false, true, false, false]);
    assert_eq!(game.events[3].hold_duration(LogicalKey::Key0), 3);
    assert_eq!(game.events[1].tick(), 2);
}

#[test]
fn scripted_press_and_release() {
    let mut config = Config::default();
    config.input.debounce_ticks = 2;
    let mut rig = rig(config);
    let key = KeySet::from([LogicalKey::Up]);
    let none = KeySet::empty();
    rig.input.script([none, none, key, key, key, none, none]);
    let mut game = Recorder {
        terminate_on: Some(7),
        ..Recorder::default()
    };

    rig.runtime.run(&mut game).unwrap();

    let pressed_at: Vec<u64> = game
        .events
        .iter()
        .filter(|e| e.is_just_pressed(LogicalKey::Up))
        .map(KeyEvents::tick)
        .collect();
    let released_at: Vec<u64> = game
        .events
        .iter()
        .filter(|e| e.is_just_released(LogicalKey::Up))
        .map(KeyEvents::tick)
        .collect();
    assert_eq!(pressed_at, vec![4]);
    assert_eq!(released_at, vec![7]);
}

#[test]
fn failed_poll_reuses_previous_samples() {
    let mut config = Config::default();
    config.input.debounce_ticks = 0;
    let mut rig = rig(config);
    rig.input.press(LogicalKey::Key5);
    rig.input.script([KeySet::empty()]);

    let input = rig.input.clone();
    let mut game = Recorder {
        terminate_on: Some(3),
        on_update: Some(Box::new(move |tick| {
            if tick == 1 {
                input.fail_next_polls(1);
            }
        })),
        ..Recorder::default()
    };

    rig.runtime.run(&mut game).unwrap();

    assert!(!game.events[1].is_pressed(LogicalKey::Key5));
    assert!(game.events[2].is_just_pressed(LogicalKey::Key5));
    assert_eq!(rig.input.polls(), 3);
}

#[test]
fn rotated_display_swaps_layout_and_maps_pixels() {
    let mut config = Config::default();
    config.display.rotation = Rotation::Deg90;
    let mut rig = rig(config);
    let mut game = Recorder {
        terminate_on: Some(2),
        pixel: Some((0, 1)),
        ..Recorder::default()
    };

    let report = rig.runtime.run(&mut game).unwrap();

    assert_eq!(game.layout_seen, Some((64, 128)));
    assert_eq!(report.logical_size, Size::new(64, 128));
    let frame = rig.display.last_frame().unwrap();
    assert_eq!(frame.set_pixels().collect::<Vec<_>>(), vec![(127, 0)]);
}

#[test]
fn smaller_layout_limits_the_screen() {
    let mut rig = rig(Config::default());
    let mut game = Recorder {
        terminate_on: Some(2),
        layout_result: Some((32, 16)),
        pixel: Some((40, 5)),
        ..Recorder::default()
    };

    let report = rig.runtime.run(&mut game).unwrap();

    assert_eq!(report.logical_size, Size::new(32, 16));
    assert_eq!(game.screen_size, Some(Size::new(32, 16)));
    assert_eq!(rig.display.last_frame().unwrap().count_set(), 0);
}

#[test]
fn layout_larger_than_display_is_clamped() {
    let mut rig = rig(Config::default());
    let mut game = Recorder {
        terminate_on: Some(2),
        layout_result: Some((512, 512)),
        pixel: Some((127, 63)),
        ..Recorder::default()
    };

    rig.runtime.run(&mut game).unwrap();

    assert_eq!(game.screen_size, Some(Size::new(128, 64)));
    let frame = rig.display.last_frame().unwrap();
    assert_eq!(frame.set_pixels().collect::<Vec<_>>(), vec![(127, 63)]);
}

#[test]
fn rotation_can_change_before_running() {
    let mut config = Config::default();
    config.display.rotation = Rotation::Deg90;
    let mut rig = rig(config);
    rig.runtime.set_rotation(Rotation::Deg180);
    assert_eq!(rig.runtime.rotation(), Rotation::Deg180);

    let mut game = Recorder {
        terminate_on: Some(2),
        pixel: Some((1, 1)),
        ..Recorder::default()
    };
    rig.runtime.run(&mut game).unwrap();

    assert_eq!(game.layout_seen, Some((128, 64)));
    let frame = rig.display.last_frame().unwrap();
    assert_eq!(frame.set_pixels().collect::<Vec<_>>(), vec![(127, 63)]);
}

#[test]
fn slow_update_delays_without_catch_up() {
    let mut config = Config::default();
    config.runtime.max_ticks = Some(3);
    let mut rig = rig(config);
    let clock = rig.clock.clone();
    let mut game = Recorder {
        on_update: Some(Box::new(move |tick| {
            if tick == 1 {
                clock.advance(Duration::from_millis(100));
            }
        })),
        ..Recorder::default()
    };

    let report = rig.runtime.run(&mut game).unwrap();

    assert_eq!(report.late_ticks, 1);
    assert_eq!(rig.clock_now(), Duration::from_millis(164));
}

/// Draws a missing asset every frame.
struct AssetGame;

impl Game for AssetGame {
    fn update(&mut self, keys: &KeyEvents) -> Result<(), GameError> {
        if keys.tick() >= 3 {
            return Err(GameError::Termination);
        }
        Ok(())
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        screen.draw_asset("missing.png", &DrawImageOptions::new(GeoM::new()));
        screen.println("still running");
    }
}

#[test]
fn missing_asset_does_not_stop_the_loop() {
    let mut rig = rig(Config::default());
    let report = rig.runtime.run(&mut AssetGame).unwrap();
    assert_eq!(report.frames, 2);
    assert!(rig.runtime.assets_mut().has_failed("missing.png"));
    assert!(rig.display.last_frame().unwrap().count_set() > 0);
}

struct BrokenBoard;

impl Hardware for BrokenBoard {
    fn name(&self) -> &str {
        "broken"
    }

    fn init(&mut self, _config: &Config) -> Result<Devices, RuntimeError> {
        Err(RuntimeError::HardwareInit("display not responding".into()))
    }
}

struct MockBoard;

impl Hardware for MockBoard {
    fn name(&self) -> &str {
        "mock"
    }

    fn init(&mut self, config: &Config) -> Result<Devices, RuntimeError> {
        Ok(Devices::new(
            MockInput::new(),
            MockDisplay::new(config.display_size()),
        ))
    }
}

#[test]
fn hardware_bring_up() {
    assert!(matches!(
        Runtime::from_hardware(Config::default(), &mut BrokenBoard),
        Err(RuntimeError::HardwareInit(_))
    ));

    let mut runtime = Runtime::from_hardware(Config::default(), &mut MockBoard)
        .unwrap()
        .with_clock(ManualClock::new());
    let mut game = Recorder {
        terminate_on: Some(1),
        ..Recorder::default()
    };
    assert_eq!(runtime.run(&mut game).unwrap().ticks, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = Config::default();
    config.runtime.tick_ms = 0;
    let devices = Devices::new(MockInput::new(), MockDisplay::new(Size::new(8, 8)));
    assert!(matches!(
        Runtime::new(config, devices),
        Err(RuntimeError::Config(_))
    ));
}

impl Rig {
    fn clock_now(&self) -> Duration {
        use pixtick_runtime::Clock;
        self.clock.now()
    }
}
