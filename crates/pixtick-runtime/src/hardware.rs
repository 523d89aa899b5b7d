//! Hardware bring-up.

use pixtick_input::RawInput;
use pixtick_render::Surface;

use crate::config::Config;
use crate::error::RuntimeError;

/// The devices a [`crate::Runtime`] drives.
pub struct Devices {
    pub input: Box<dyn RawInput>,
    /// The panel in its native orientation.
    pub display: Box<dyn Surface>,
}

impl Devices {
    pub fn new(input: impl RawInput + 'static, display: impl Surface + 'static) -> Self {
        Self {
            input: Box::new(input),
            display: Box::new(display),
        }
    }
}

/// A board that can bring up its input and display devices.
pub trait Hardware {
    /// Human-readable board name for logs.
    fn name(&self) -> &str;

    fn init(&mut self, config: &Config) -> Result<Devices, RuntimeError>;
}
