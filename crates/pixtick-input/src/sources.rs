//! Physical input sources.
//!
//! Each source owns a disjoint range of the logical key space:
//!
//! | source            | keys                              |
//! |-------------------|-----------------------------------|
//! | [`KeyMatrix`]     | `Key0..Key11`, `row * cols + col` |
//! | [`DigitalButtons`]| `RotaryButton`, `Joystick`        |
//! | [`RotaryEncoder`] | `RotaryLeft`, `RotaryRight`       |
//! | [`AnalogJoystick`]| `Left`, `Right`, `Up`, `Down`     |
//!
//! [`InputBoard`] composes sources into one [`RawInput`] and refuses
//! sources whose keys overlap.

use pixtick_types::{KeySet, LogicalKey, KEY_COUNT};

use crate::error::InputError;
use crate::RawInput;

/// A physical source driving a fixed set of logical keys.
pub trait KeySource: Send {
    /// Keys this source drives.
    fn keys(&self) -> KeySet;

    /// Latch the source's state for this tick.
    fn begin_tick(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    /// Whether `key` is asserted. Only called for keys in [`Self::keys`].
    fn sample(&mut self, key: LogicalKey) -> bool;
}

/// A set of sources exposed as one [`RawInput`].
#[derive(Default)]
pub struct InputBoard {
    sources: Vec<Box<dyn KeySource>>,
    owners: [Option<usize>; KEY_COUNT],
}

impl InputBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source. Fails if one of its keys is already driven.
    pub fn add(&mut self, source: impl KeySource + 'static) -> Result<(), InputError> {
        let keys = source.keys();
        if let Some(taken) = keys.iter().find(|k| self.owners[k.index()].is_some()) {
            return Err(InputError::KeyConflict(taken));
        }
        let slot = self.sources.len();
        for key in keys.iter() {
            self.owners[key.index()] = Some(slot);
        }
        self.sources.push(Box::new(source));
        Ok(())
    }

    pub fn with(mut self, source: impl KeySource + 'static) -> Result<Self, InputError> {
        self.add(source)?;
        Ok(self)
    }

    /// Keys driven by any source on this board.
    pub fn keys(&self) -> KeySet {
        LogicalKey::ALL
            .into_iter()
            .filter(|k| self.owners[k.index()].is_some())
            .collect()
    }
}

impl RawInput for InputBoard {
    fn begin_tick(&mut self) -> Result<(), InputError> {
        for source in &mut self.sources {
            source.begin_tick()?;
        }
        Ok(())
    }

    fn sample_line(&mut self, key: LogicalKey) -> bool {
        match self.owners[key.index()] {
            Some(slot) => self.sources[slot].sample(key),
            None => false,
        }
    }
}

/// Row/column access to a scanned key matrix.
pub trait MatrixPins: Send {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    /// Drive `col` and read `row`; true when the switch is closed.
    fn is_closed(&mut self, row: usize, col: usize) -> bool;
}

/// Scanned key matrix on `Key0..Key11`.
pub struct KeyMatrix<P> {
    pins: P,
    latched: KeySet,
}

impl<P: MatrixPins> KeyMatrix<P> {
    pub fn new(pins: P) -> Result<Self, InputError> {
        let count = pins.rows() * pins.cols();
        if count == 0 || count > LogicalKey::MATRIX.len() {
            return Err(InputError::Layout(format!(
                "{}x{} matrix does not fit {} matrix keys",
                pins.rows(),
                pins.cols(),
                LogicalKey::MATRIX.len()
            )));
        }
        Ok(Self {
            pins,
            latched: KeySet::empty(),
        })
    }
}

impl<P: MatrixPins> KeySource for KeyMatrix<P> {
    fn keys(&self) -> KeySet {
        let count = self.pins.rows() * self.pins.cols();
        LogicalKey::MATRIX.into_iter().take(count).collect()
    }

    fn begin_tick(&mut self) -> Result<(), InputError> {
        let cols = self.pins.cols();
        let mut latched = KeySet::empty();
        for col in 0..cols {
            for row in 0..self.pins.rows() {
                if self.pins.is_closed(row, col) {
                    latched.insert(LogicalKey::MATRIX[row * cols + col]);
                }
            }
        }
        self.latched = latched;
        Ok(())
    }

    fn sample(&mut self, key: LogicalKey) -> bool {
        self.latched.contains(key)
    }
}

/// A single digital input pin.
pub trait DigitalPin: Send {
    fn is_high(&mut self) -> bool;
}

/// Discrete buttons on digital pins (rotary push, joystick center).
pub struct DigitalButtons {
    pins: Vec<(LogicalKey, Box<dyn DigitalPin>)>,
    active_low: bool,
}

impl DigitalButtons {
    /// Buttons that read high when pressed.
    pub fn active_high() -> Self {
        Self {
            pins: Vec::new(),
            active_low: false,
        }
    }

    /// Buttons wired to a pull-up, reading low when pressed.
    pub fn active_low() -> Self {
        Self {
            pins: Vec::new(),
            active_low: true,
        }
    }

    /// Bind `key` to `pin`, replacing any earlier binding for `key`.
    #[must_use]
    pub fn with(mut self, key: LogicalKey, pin: impl DigitalPin + 'static) -> Self {
        self.pins.retain(|(k, _)| *k != key);
        self.pins.push((key, Box::new(pin)));
        self
    }
}

impl KeySource for DigitalButtons {
    fn keys(&self) -> KeySet {
        self.pins.iter().map(|(k, _)| *k).collect()
    }

    fn sample(&mut self, key: LogicalKey) -> bool {
        let active_low = self.active_low;
        self.pins
            .iter_mut()
            .find(|(k, _)| *k == key)
            .is_some_and(|(_, pin)| pin.is_high() != active_low)
    }
}

/// Accumulated quadrature position of a rotary encoder.
pub trait QuadratureCounter: Send {
    fn position(&mut self) -> i32;
}

/// Rotary encoder mapped to the `RotaryLeft` / `RotaryRight` pulse keys.
///
/// A key is asserted on every tick where the position moved in its
/// direction since the previous tick.
pub struct RotaryEncoder<C> {
    counter: C,
    last: i32,
    inverted: bool,
    step: Option<LogicalKey>,
}

impl<C: QuadratureCounter> RotaryEncoder<C> {
    pub fn new(mut counter: C) -> Self {
        let last = counter.position();
        Self {
            counter,
            last,
            inverted: false,
            step: None,
        }
    }

    /// Swap the two directions, for encoders wired the other way round.
    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }
}

impl<C: QuadratureCounter> KeySource for RotaryEncoder<C> {
    fn keys(&self) -> KeySet {
        KeySet::from([LogicalKey::RotaryLeft, LogicalKey::RotaryRight])
    }

    fn begin_tick(&mut self) -> Result<(), InputError> {
        let position = self.counter.position();
        let (decrease, increase) = if self.inverted {
            (LogicalKey::RotaryRight, LogicalKey::RotaryLeft)
        } else {
            (LogicalKey::RotaryLeft, LogicalKey::RotaryRight)
        };
        self.step = match position.cmp(&self.last) {
            std::cmp::Ordering::Less => Some(decrease),
            std::cmp::Ordering::Greater => Some(increase),
            std::cmp::Ordering::Equal => None,
        };
        self.last = position;
        Ok(())
    }

    fn sample(&mut self, key: LogicalKey) -> bool {
        self.step == Some(key)
    }
}

/// Raw 16-bit ADC readings of a two-axis joystick.
pub trait AnalogAxes: Send {
    fn read_x(&mut self) -> u16;
    fn read_y(&mut self) -> u16;
}

/// ADC levels beyond which an axis counts as deflected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickThresholds {
    pub low: u16,
    pub high: u16,
}

impl Default for JoystickThresholds {
    fn default() -> Self {
        Self {
            low: 0x4800,
            high: 0xB800,
        }
    }
}

/// Analog joystick mapped to the four direction keys.
///
/// `x < low` is left, `x > high` is right, `y > high` is up and
/// `y < low` is down.
pub struct AnalogJoystick<A> {
    axes: A,
    thresholds: JoystickThresholds,
    latched: KeySet,
}

impl<A: AnalogAxes> AnalogJoystick<A> {
    pub fn new(axes: A, thresholds: JoystickThresholds) -> Result<Self, InputError> {
        if thresholds.low >= thresholds.high {
            return Err(InputError::Layout(format!(
                "joystick low threshold {:#06x} must be below high threshold {:#06x}",
                thresholds.low, thresholds.high
            )));
        }
        Ok(Self {
            axes,
            thresholds,
            latched: KeySet::empty(),
        })
    }
}

impl<A: AnalogAxes> KeySource for AnalogJoystick<A> {
    fn keys(&self) -> KeySet {
        KeySet::from([
            LogicalKey::Left,
            LogicalKey::Right,
            LogicalKey::Up,
            LogicalKey::Down,
        ])
    }

    fn begin_tick(&mut self) -> Result<(), InputError> {
        let x = self.axes.read_x();
        let y = self.axes.read_y();
        let JoystickThresholds { low, high } = self.thresholds;

        let mut latched = KeySet::empty();
        latched.set(LogicalKey::Left, x < low);
        latched.set(LogicalKey::Right, x > high);
        latched.set(LogicalKey::Up, y > high);
        latched.set(LogicalKey::Down, y < low);
        self.latched = latched;
        Ok(())
    }

    fn sample(&mut self, key: LogicalKey) -> bool {
        self.latched.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAxes, MockCounter, MockMatrix, MockPin};
    use crate::sample_all;

    #[test]
    fn matrix_maps_row_major() {
        let pins = MockMatrix::new(3, 4);
        let mut matrix = KeyMatrix::new(pins.clone()).unwrap();
        assert_eq!(matrix.keys().len(), 12);

        pins.set(0, 0, true);
        pins.set(1, 2, true);
        pins.set(2, 3, true);
        matrix.begin_tick().unwrap();
        assert!(matrix.sample(LogicalKey::Key0));
        assert!(matrix.sample(LogicalKey::Key6));
        assert!(matrix.sample(LogicalKey::Key11));
        assert!(!matrix.sample(LogicalKey::Key1));
    }

    #[test]
    fn matrix_rejects_oversized_layout() {
        assert!(matches!(
            KeyMatrix::new(MockMatrix::new(4, 4)),
            Err(InputError::Layout(_))
        ));
        assert!(KeyMatrix::new(MockMatrix::new(0, 4)).is_err());
    }

    #[test]
    fn rotary_pulses_on_position_change() {
        let counter = MockCounter::default();
        let mut rotary = RotaryEncoder::new(counter.clone());

        rotary.begin_tick().unwrap();
        assert!(!rotary.sample(LogicalKey::RotaryLeft));
        assert!(!rotary.sample(LogicalKey::RotaryRight));

        counter.turn(2);
        rotary.begin_tick().unwrap();
        assert!(rotary.sample(LogicalKey::RotaryRight));
        assert!(!rotary.sample(LogicalKey::RotaryLeft));

        rotary.begin_tick().unwrap();
        assert!(!rotary.sample(LogicalKey::RotaryRight));

        counter.turn(-1);
        rotary.begin_tick().unwrap();
        assert!(rotary.sample(LogicalKey::RotaryLeft));
    }

    #[test]
    fn rotary_inversion_swaps_directions() {
        let counter = MockCounter::default();
        let mut rotary = RotaryEncoder::new(counter.clone()).inverted(true);
        counter.turn(1);
        rotary.begin_tick().unwrap();
        assert!(rotary.sample(LogicalKey::RotaryLeft));
    }

    #[test]
    fn joystick_thresholds() {
        let axes = MockAxes::centered();
        let mut stick = AnalogJoystick::new(axes.clone(), JoystickThresholds::default()).unwrap();

        stick.begin_tick().unwrap();
        assert!(LogicalKey::ALL.iter().all(|k| !stick.sample(*k)));

        axes.set(0x1000, 0xF000);
        stick.begin_tick().unwrap();
        assert!(stick.sample(LogicalKey::Left));
        assert!(stick.sample(LogicalKey::Up));
        assert!(!stick.sample(LogicalKey::Right));
        assert!(!stick.sample(LogicalKey::Down));

        axes.set(0xC000, 0x0100);
        stick.begin_tick().unwrap();
        assert!(stick.sample(LogicalKey::Right));
        assert!(stick.sample(LogicalKey::Down));
    }

    #[test]
    fn joystick_rejects_inverted_thresholds() {
        let bad = JoystickThresholds {
            low: 0xB800,
            high: 0x4800,
        };
        assert!(AnalogJoystick::new(MockAxes::centered(), bad).is_err());
    }

    #[test]
    fn digital_buttons_active_low() {
        let rotary = MockPin::new(true);
        let stick = MockPin::new(true);
        let mut buttons = DigitalButtons::active_low()
            .with(LogicalKey::RotaryButton, rotary.clone())
            .with(LogicalKey::Joystick, stick.clone());
        assert!(!buttons.sample(LogicalKey::RotaryButton));
        rotary.set(false);
        assert!(buttons.sample(LogicalKey::RotaryButton));
        assert!(!buttons.sample(LogicalKey::Joystick));
    }

    #[test]
    fn board_routes_lines_to_sources() {
        let matrix = MockMatrix::new(3, 4);
        let counter = MockCounter::default();
        let axes = MockAxes::centered();
        let pin = MockPin::new(true);

        let mut board = InputBoard::new()
            .with(KeyMatrix::new(matrix.clone()).unwrap())
            .unwrap()
            .with(DigitalButtons::active_low().with(LogicalKey::RotaryButton, pin.clone()))
            .unwrap()
            .with(RotaryEncoder::new(counter.clone()))
            .unwrap()
            .with(AnalogJoystick::new(axes.clone(), JoystickThresholds::default()).unwrap())
            .unwrap();
        assert_eq!(board.keys().len(), 19);

        matrix.set(2, 1, true);
        pin.set(false);
        counter.turn(-3);
        axes.set(0x8000, 0x0000);

        board.begin_tick().unwrap();
        let lines = sample_all(&mut board);
        assert_eq!(
            lines,
            KeySet::from([
                LogicalKey::Key9,
                LogicalKey::RotaryButton,
                LogicalKey::RotaryLeft,
                LogicalKey::Down,
            ])
        );
        assert!(!board.sample_line(LogicalKey::Joystick));
    }

    #[test]
    fn board_rejects_overlapping_sources() {
        let mut board = InputBoard::new();
        board
            .add(RotaryEncoder::new(MockCounter::default()))
            .unwrap();
        let err = board
            .add(RotaryEncoder::new(MockCounter::default()))
            .unwrap_err();
        assert!(matches!(err, InputError::KeyConflict(LogicalKey::RotaryLeft)));
    }
}
