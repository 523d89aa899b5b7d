//! The fixed-tick game loop.

use pixtick_input::{sample_all, InputHandle, KeyEvents, RawInput};
use pixtick_render::{BitmapCache, DirSource, Rotated, Screen, StaticSource, Surface, Viewport};
use pixtick_types::{KeySet, Rotation, Size};
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock, Ticker};
use crate::config::Config;
use crate::error::{GameError, RuntimeError};
use crate::game::Game;
use crate::hardware::{Devices, Hardware};
use crate::state::LoopState;

/// Why a run ended cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `update` returned [`GameError::Termination`].
    Terminated,
    /// The configured tick limit was reached.
    TickLimit,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Ticks started, the terminating one included.
    pub ticks: u64,
    /// Frames drawn and presented.
    pub frames: u64,
    /// Ticks whose boundary had already passed when the loop got to them.
    pub late_ticks: u64,
    /// Size returned by [`Game::layout`], the frame games draw into.
    pub logical_size: Size,
}

/// Drives a [`Game`] at a fixed tick rate.
///
/// Per tick: wait for the boundary, sample input, advance the debouncer,
/// `update`, clear, `draw`, `present`.
pub struct Runtime {
    config: Config,
    input: Box<dyn RawInput>,
    display: Rotated<Box<dyn Surface>>,
    keys: InputHandle,
    assets: BitmapCache,
    clock: Box<dyn Clock>,
    state: LoopState,
    last_raw: KeySet,
}

impl Runtime {
    pub fn new(config: Config, devices: Devices) -> Result<Self, RuntimeError> {
        config.validate()?;
        let assets = match &config.assets.dir {
            Some(dir) => BitmapCache::new(DirSource::new(dir)),
            None => BitmapCache::new(StaticSource::new()),
        };
        Ok(Self {
            input: devices.input,
            display: Rotated::new(devices.display, config.display.rotation),
            keys: InputHandle::new(config.thresholds()),
            assets,
            clock: Box::new(SystemClock::new()),
            state: LoopState::Running,
            last_raw: KeySet::empty(),
            config,
        })
    }

    /// Bring up `hardware` and build a runtime on its devices.
    pub fn from_hardware(config: Config, hardware: &mut dyn Hardware) -> Result<Self, RuntimeError> {
        let devices = hardware.init(&config)?;
        info!(board = hardware.name(), "hardware initialised");
        Self::new(config, devices)
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_assets(mut self, assets: BitmapCache) -> Self {
        self.assets = assets;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn rotation(&self) -> Rotation {
        self.display.rotation()
    }

    /// Change the display rotation. Takes effect from the next frame.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        debug!(from = %self.display.rotation(), to = %rotation, "display rotation changed");
        self.display.set_rotation(rotation);
    }

    /// Shared handle to the debounced key state.
    pub fn keys(&self) -> InputHandle {
        self.keys.clone()
    }

    pub fn assets_mut(&mut self) -> &mut BitmapCache {
        &mut self.assets
    }

    /// Run `game` until it terminates, fails, or the tick limit is hit.
    pub fn run(&mut self, game: &mut dyn Game) -> Result<RunReport, RuntimeError> {
        if self.state.is_finished() {
            return Err(RuntimeError::Finished);
        }

        let outside = self.display.size();
        let (width, height) = game.layout(outside.width, outside.height);
        let logical_size = Size::new(width, height);
        if logical_size.is_empty() {
            self.state = LoopState::Errored;
            return Err(RuntimeError::Layout(format!(
                "game returned logical size {logical_size} for a {outside} display"
            )));
        }

        let mut ticker = Ticker::new(self.config.tick_period());
        let mut report = RunReport {
            outcome: Outcome::Terminated,
            ticks: 0,
            frames: 0,
            late_ticks: 0,
            logical_size,
        };
        info!(
            display = %outside,
            logical = %logical_size,
            rotation = %self.display.rotation(),
            tick_ms = self.config.runtime.tick_ms,
            "game loop started"
        );

        let result = self.run_ticks(game, &mut ticker, &mut report);
        match &result {
            Ok(()) => {
                self.state = LoopState::Terminated;
                info!(
                    ticks = report.ticks,
                    frames = report.frames,
                    outcome = ?report.outcome,
                    "game loop stopped"
                );
            }
            Err(e) => {
                self.state = LoopState::Errored;
                error!(ticks = report.ticks, error = %e, "game loop failed");
            }
        }
        result.map(|()| report)
    }

    fn run_ticks(
        &mut self,
        game: &mut dyn Game,
        ticker: &mut Ticker,
        report: &mut RunReport,
    ) -> Result<(), RuntimeError> {
        loop {
            if let Some(max) = self.config.runtime.max_ticks {
                if report.ticks >= max {
                    report.outcome = Outcome::TickLimit;
                    return Ok(());
                }
            }

            if let Some(late) = ticker.wait(self.clock.as_mut()) {
                report.late_ticks += 1;
                debug!(tick = report.ticks + 1, late_ms = late.as_millis() as u64, "tick boundary missed");
            }
            report.ticks += 1;

            let raw = self.sample_input();
            self.keys.advance(raw);
            let events: KeyEvents = self.keys.snapshot();

            match game.update(&events) {
                Ok(()) => {}
                Err(GameError::Termination) => {
                    report.outcome = Outcome::Terminated;
                    return Ok(());
                }
                Err(GameError::Other(e)) => return Err(RuntimeError::Game(e)),
            }

            self.display.clear();
            {
                let mut view = Viewport::new(&mut self.display, report.logical_size);
                let mut screen =
                    Screen::new(&mut view, &mut self.assets).with_clip(self.config.display.clip);
                game.draw(&mut screen);
            }
            self.display.present()?;
            report.frames += 1;
        }
    }

    /// Sample every line, falling back to the previous tick's samples when
    /// the backend fails to poll.
    fn sample_input(&mut self) -> KeySet {
        match self.input.begin_tick() {
            Ok(()) => self.last_raw = sample_all(self.input.as_mut()),
            Err(e) => warn!(error = %e, "input poll failed, reusing previous samples"),
        }
        self.last_raw
    }
}
