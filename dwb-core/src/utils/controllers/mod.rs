//! Module Exports
//!
//! This file exports key modules used in the robotics control system.
//!
//! - `bus`: fire-and-forget transport to the motor driver.
//! - `frame`: three byte motor command frames.
//! - `wheels`: the differential-drive wheel controller.
//! - `leds`: status LED chain.

pub mod bus;
pub mod frame;
pub mod leds;
/// Module for the two-wheel motor controller.
pub mod wheels;

use core::cell::RefCell;

use embedded_hal_bus::i2c::RefCellDevice;
use serde::{Deserialize, Serialize};

pub use bus::{BusPins, I2cBus, MotorBus};
pub use frame::{Direction, Drive, WheelSide};
pub use leds::{LEDCommand, LedModule, LED_CHANNEL};
pub use wheels::{MotionState, WheelCommand, WheelConfig, WheelController, WHEEL_CHANNEL};

use crate::utils::math::drive::TurnRatio;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "ct", rename_all = "snake_case")] // ct = command type
pub enum SystemCommand {
    W(WheelCommand),
    L(LEDCommand),
}

/// Wheel controller bound to a device on a shared I2C bus.
pub type SharedWheels<I2C> = WheelController<I2cBus<RefCellDevice<'static, I2C>>>;

pub struct SystemController<I2C: 'static> {
    pub wheels: SharedWheels<I2C>,
    /// Settings in effect; `address` follows runtime address changes.
    pub config: WheelConfig,
}
impl<I2C> SystemController<I2C>
where
    I2C: embedded_hal::i2c::I2c + 'static,
{
    /// Build and initialize the wheel controller on `i2c_bus`.
    ///
    /// Missing settings fall back to [`WheelConfig::default`].
    pub fn new(
        i2c_bus: &'static RefCell<I2C>,
        address: Option<u8>,
        pins: Option<BusPins>,
        turn_ratio: Option<TurnRatio>,
    ) -> Self {
        let defaults = WheelConfig::default();
        let config = WheelConfig {
            address: address.unwrap_or(defaults.address),
            pins: pins.unwrap_or(defaults.pins),
            turn_ratio: turn_ratio.unwrap_or(defaults.turn_ratio),
        };

        let bus = I2cBus::new(RefCellDevice::new(i2c_bus));
        let mut wheels = WheelController::with_turn_ratio(bus, config.turn_ratio);
        wheels.initialize(config.address, config.pins);

        SystemController { wheels, config }
    }

    /// Apply a wheel command and return the resulting motion state.
    pub fn execute(
        &mut self,
        command: WheelCommand,
    ) -> MotionState {
        self.wheels.execute(command);
        self.config.address = self.wheels.address();
        self.wheels.state()
    }

    /// Execute one received command and post a state indication to
    /// `LED_CHANNEL` when the motion state changed.
    pub fn handle(
        &mut self,
        command: WheelCommand,
    ) -> MotionState {
        tracing::info!("Received wheel command: {:?}", command);
        let before = self.wheels.state();
        let state = self.execute(command);
        tracing::info!(%state, speed = self.wheels.speed(), "wheel command executed");
        // best-effort status indication
        if state != before && LED_CHANNEL.try_send(LEDCommand::St { st: state }).is_err() {
            tracing::debug!("LED channel full, state indication dropped");
        }
        state
    }

    pub async fn wheel_ch(&mut self) -> ! {
        loop {
            let command = WHEEL_CHANNEL.receiver().receive().await;
            self.handle(command);
        }
    }
}
