//! Bus transport used by the wheel controller.
//!
//! The motor driver never acknowledges a command, so the transport is
//! fire-and-forget: `write` returns nothing and the caller cannot tell a
//! delivered frame from a lost one.

use embedded_hal::i2c::I2c;

/// Default SDA line on the reference board.
pub const DEFAULT_SDA: u8 = 6;
/// Default SCL line on the reference board.
pub const DEFAULT_SCL: u8 = 5;

/// Data/clock lines the bus is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusPins {
    pub sda: u8,
    pub scl: u8,
}

impl Default for BusPins {
    fn default() -> Self {
        BusPins {
            sda: DEFAULT_SDA,
            scl: DEFAULT_SCL,
        }
    }
}

/// Addressed, unacknowledged write transport.
///
/// The bus is shared, so `open` takes only the lines; the peripheral address
/// travels with every `write` and may change between writes.
pub trait MotorBus {
    /// Bind the bus to its control lines.
    fn open(
        &mut self,
        pins: BusPins,
    );

    /// Send `bytes` to the peripheral at `address`.
    fn write(
        &mut self,
        address: u8,
        bytes: &[u8],
    );
}

/// [`MotorBus`] over any `embedded-hal` I2C implementation.
///
/// Pin muxing and clock setup belong to the HAL that built `I2C`, so `open`
/// only records the lines for diagnostics. Transfer errors are logged and
/// dropped.
pub struct I2cBus<I2C> {
    i2c: I2C,
    pins: Option<BusPins>,
}

impl<I2C> I2cBus<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        I2cBus { i2c, pins: None }
    }

    /// Lines recorded by the last `open`, if any.
    pub fn pins(&self) -> Option<BusPins> {
        self.pins
    }
}

impl<I2C> MotorBus for I2cBus<I2C>
where
    I2C: I2c,
{
    fn open(
        &mut self,
        pins: BusPins,
    ) {
        tracing::info!(sda = pins.sda, scl = pins.scl, "I2C bus opened");
        self.pins = Some(pins);
    }

    fn write(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) {
        tracing::trace!("I2C write 0x{:02X} {:02X?}", address, bytes);
        if let Err(e) = self.i2c.write(address, bytes) {
            tracing::warn!("I2C write to 0x{:02X} failed: {:?}", address, e);
        }
    }
}
