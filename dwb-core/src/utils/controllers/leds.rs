//! Status LED module for the Differential Wheel Bot.
//!
//! Manages an addressable LED chain via `SmartLedsWrite` and dispatches commands
//! received over `LED_CHANNEL`. Besides plain colours the chain can blink a
//! feedback pattern and show the current motion state.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Timer;
use serde::{Deserialize, Serialize};
use smart_leds_trait::{SmartLedsWrite, RGB8};

use super::wheels::MotionState;

/// Channel used to receive LED commands (`LEDCommand` messages).
pub static LED_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, LEDCommand, 16> =
    embassy_sync::channel::Channel::new();

/// Number of LEDs in the attached chain.
const LED_COUNT: usize = 2;

const WHITE: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};
const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// LED command variants.
///
/// Serialized as JSON with tag `"lc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "lc", rename_all = "snake_case")]
pub enum LEDCommand {
    /// Turn the LEDs on (last color or white).
    On,
    /// Turn all LEDs off (set to black).
    Off,
    /// Set the LED strip to the given RGB color.
    SC { r: u8, g: u8, b: u8 },
    /// Blink `n` times, `on`/`off` milliseconds per cycle.
    B { n: u8, on: u16, off: u16 },
    /// Show the colour assigned to a motion state.
    St { st: MotionState },
}

/// Colour shown for each motion state.
pub const fn state_color(state: MotionState) -> RGB8 {
    match state {
        MotionState::Stopped => RGB8 { r: 255, g: 0, b: 0 },
        MotionState::Forward => RGB8 { r: 0, g: 255, b: 0 },
        MotionState::Backward => RGB8 {
            r: 255,
            g: 96,
            b: 0,
        },
        MotionState::TurnLeft | MotionState::TurnRight => RGB8 {
            r: 255,
            g: 200,
            b: 0,
        },
        MotionState::RotateLeft | MotionState::RotateRight => RGB8 { r: 0, g: 0, b: 255 },
    }
}

/// High-level LED controller that drives a strip of addressable LEDs.
///
/// Maintains the on/off state and last selected color.
pub struct LedModule<Driver> {
    driver: Driver,
    is_on: bool,
    last_color: Option<RGB8>,
}

impl<Driver, E> LedModule<Driver>
where
    Driver: SmartLedsWrite<Color = RGB8, Error = E>,
{
    /// Create a new `LedModule` over the given LED driver.
    ///
    /// The strip is initially off with no last color.
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            is_on: false,
            last_color: None,
        }
    }

    /// Execute an incoming `LEDCommand`, updating internal state and LED strip.
    ///
    /// - `On`: enable LEDs with the last color or white.
    /// - `Off`: disable LEDs (all black).
    /// - `SC {r,g,b}` / `St {st}`: set a new color, applied immediately if strip is on.
    /// - `B {n,on,off}`: blink the current color (white if none), then restore.
    pub async fn ex_command(
        &mut self,
        cmd: LEDCommand,
    ) -> Result<(), E> {
        match cmd {
            LEDCommand::On => {
                self.is_on = true;
                self.set_all(self.color())?;
            }
            LEDCommand::Off => {
                self.is_on = false;
                self.set_all(BLACK)?;
            }
            LEDCommand::SC { r, g, b } => self.set_color(RGB8 { r, g, b })?,
            LEDCommand::St { st } => self.set_color(state_color(st))?,
            LEDCommand::B { n, on, off } => self.blink(n, on, off).await?,
        }
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn last_color(&self) -> Option<RGB8> {
        self.last_color
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    async fn blink(
        &mut self,
        times: u8,
        on_ms: u16,
        off_ms: u16,
    ) -> Result<(), E> {
        let color = self.color();
        for i in 0..times {
            self.set_all(color)?;
            Timer::after_millis(u64::from(on_ms)).await;
            self.set_all(BLACK)?;
            if i + 1 < times {
                Timer::after_millis(u64::from(off_ms)).await;
            }
        }
        if self.is_on {
            self.set_all(color)?;
        }
        Ok(())
    }

    fn set_color(
        &mut self,
        color: RGB8,
    ) -> Result<(), E> {
        self.last_color = Some(color);
        if self.is_on {
            self.set_all(color)?;
        }
        Ok(())
    }

    fn color(&self) -> RGB8 {
        self.last_color.unwrap_or(WHITE)
    }

    /// Set all LEDs in the strip to the specified color.
    fn set_all(
        &mut self,
        color: RGB8,
    ) -> Result<(), E> {
        let data = core::iter::repeat(color).take(LED_COUNT);
        self.driver.write(data)
    }
}
