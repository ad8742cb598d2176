//! Differential-drive wheel controller.
//!
//! Translates motion intents (stop, forward, backward, turn, rotate) into
//! pairs of motor frames, left wheel first, and tracks the last commanded
//! motion. The driver never acknowledges a frame, so [`WheelController::state`]
//! is what was last *sent*, not what the wheels are confirmed to be doing.
//!
//! Commands are received via `WHEEL_CHANNEL`.

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

use super::bus::{BusPins, MotorBus};
use super::frame::{self, Drive, WheelSide};
use crate::utils::math::drive::{wheel_drives, TurnRatio};

/// Default I2C address of the motor driver.
pub const DEFAULT_ADDRESS: u8 = 0x10;

/// Channel used to receive wheel commands (`WheelCommand` messages).
pub static WHEEL_CHANNEL: embassy_sync::channel::Channel<
    CriticalSectionRawMutex,
    WheelCommand,
    16,
> = embassy_sync::channel::Channel::new();

/// Body-level motion, as last commanded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    #[default]
    Stopped,
    Forward,
    Backward,
    /// Both wheels forward, left (inner) wheel slower.
    TurnLeft,
    /// Both wheels forward, right (inner) wheel slower.
    TurnRight,
    /// Spin in place: left backward, right forward.
    RotateLeft,
    /// Spin in place: left forward, right backward.
    RotateRight,
}

impl MotionState {
    /// Short label suitable for a small status display.
    pub const fn label(self) -> &'static str {
        match self {
            MotionState::Stopped => "STOP",
            MotionState::Forward => "FWD",
            MotionState::Backward => "BACK",
            MotionState::TurnLeft => "TURN L",
            MotionState::TurnRight => "TURN R",
            MotionState::RotateLeft => "ROT L",
            MotionState::RotateRight => "ROT R",
        }
    }
}

impl fmt::Display for MotionState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wheel command variants for motion control and driver addressing.
///
/// Serialized as JSON with tag `"wc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "wc", rename_all = "snake_case")]
pub enum WheelCommand {
    Stop,
    Forward { s: u8 },
    Backward { s: u8 },
    TurnLeft { s: u8 },
    TurnRight { s: u8 },
    RotateLeft { s: u8 },
    RotateRight { s: u8 },
    /// Enter state `st` at speed `s`.
    Set { st: MotionState, s: u8 },
    /// Change speed, keeping the current motion.
    Speed { s: u8 },
    /// Move to a new driver address.
    Address { a: u8 },
}

/// Startup configuration for the wheel controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelConfig {
    pub address: u8,
    pub pins: BusPins,
    pub turn_ratio: TurnRatio,
}

impl Default for WheelConfig {
    fn default() -> Self {
        WheelConfig {
            address: DEFAULT_ADDRESS,
            pins: BusPins::default(),
            turn_ratio: TurnRatio::HALF,
        }
    }
}

/// Two-wheel motor controller over a [`MotorBus`].
///
/// Every motion operation is silently ignored until [`initialize`] has run.
///
/// [`initialize`]: WheelController::initialize
pub struct WheelController<B> {
    bus: B,
    address: u8,
    state: MotionState,
    speed: u8,
    turn_ratio: TurnRatio,
    initialized: bool,
}

impl<B> WheelController<B>
where
    B: MotorBus,
{
    /// Create an uninitialized controller with the default turn ratio.
    pub fn new(bus: B) -> Self {
        Self::with_turn_ratio(bus, TurnRatio::HALF)
    }

    pub fn with_turn_ratio(
        bus: B,
        turn_ratio: TurnRatio,
    ) -> Self {
        WheelController {
            bus,
            address: DEFAULT_ADDRESS,
            state: MotionState::Stopped,
            speed: 0,
            turn_ratio,
            initialized: false,
        }
    }

    /// Open the bus, adopt `address` and bring both wheels to a stop.
    pub fn initialize(
        &mut self,
        address: u8,
        pins: BusPins,
    ) {
        self.bus.open(pins);
        self.address = address;
        self.state = MotionState::Stopped;
        self.speed = 0;
        self.initialized = true;
        tracing::info!("Wheel controller initialized at 0x{:02X}", address);
        self.stop();
    }

    pub fn stop(&mut self) {
        self.apply(MotionState::Stopped, 0);
    }

    pub fn forward(
        &mut self,
        speed: u8,
    ) {
        self.apply(MotionState::Forward, speed);
    }

    pub fn backward(
        &mut self,
        speed: u8,
    ) {
        self.apply(MotionState::Backward, speed);
    }

    pub fn turn_left(
        &mut self,
        speed: u8,
    ) {
        self.apply(MotionState::TurnLeft, speed);
    }

    pub fn turn_right(
        &mut self,
        speed: u8,
    ) {
        self.apply(MotionState::TurnRight, speed);
    }

    pub fn rotate_left(
        &mut self,
        speed: u8,
    ) {
        self.apply(MotionState::RotateLeft, speed);
    }

    pub fn rotate_right(
        &mut self,
        speed: u8,
    ) {
        self.apply(MotionState::RotateRight, speed);
    }

    /// Dispatch to the operation matching `state`.
    pub fn set_state(
        &mut self,
        state: MotionState,
        speed: u8,
    ) {
        match state {
            MotionState::Stopped => self.stop(),
            MotionState::Forward => self.forward(speed),
            MotionState::Backward => self.backward(speed),
            MotionState::TurnLeft => self.turn_left(speed),
            MotionState::TurnRight => self.turn_right(speed),
            MotionState::RotateLeft => self.rotate_left(speed),
            MotionState::RotateRight => self.rotate_right(speed),
        }
    }

    /// Re-send the current motion at a new speed. No-op while stopped.
    pub fn set_speed(
        &mut self,
        speed: u8,
    ) {
        if !self.initialized || self.state == MotionState::Stopped {
            tracing::debug!(speed, state = %self.state, "speed change ignored");
            return;
        }
        self.set_state(self.state, speed);
    }

    /// Switch to a new driver address.
    ///
    /// The wheels are stopped at the old address before the new one is used.
    pub fn set_address(
        &mut self,
        address: u8,
    ) {
        if address == self.address {
            return;
        }
        self.stop();
        tracing::info!(
            "Wheel driver address 0x{:02X} -> 0x{:02X}",
            self.address,
            address
        );
        self.address = address;
    }

    /// Apply a `WheelCommand`.
    pub fn execute(
        &mut self,
        command: WheelCommand,
    ) {
        match command {
            WheelCommand::Stop => self.stop(),
            WheelCommand::Forward { s } => self.forward(s),
            WheelCommand::Backward { s } => self.backward(s),
            WheelCommand::TurnLeft { s } => self.turn_left(s),
            WheelCommand::TurnRight { s } => self.turn_right(s),
            WheelCommand::RotateLeft { s } => self.rotate_left(s),
            WheelCommand::RotateRight { s } => self.rotate_right(s),
            WheelCommand::Set { st, s } => self.set_state(st, s),
            WheelCommand::Speed { s } => self.set_speed(s),
            WheelCommand::Address { a } => self.set_address(a),
        }
    }

    /// Last commanded motion.
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Last commanded speed (0 while stopped).
    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn turn_ratio(&self) -> TurnRatio {
        self.turn_ratio
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Send both wheel frames for `state`, then record it.
    fn apply(
        &mut self,
        state: MotionState,
        speed: u8,
    ) {
        if !self.initialized {
            tracing::debug!(%state, speed, "wheel controller not initialized");
            return;
        }

        let (left, right) = wheel_drives(state, speed, self.turn_ratio);
        self.send(WheelSide::Left, left);
        self.send(WheelSide::Right, right);

        self.state = state;
        self.speed = match state {
            MotionState::Stopped => 0,
            _ => speed,
        };
        tracing::debug!(%state, speed = self.speed, "wheels commanded");
    }

    fn send(
        &mut self,
        side: WheelSide,
        drive: Drive,
    ) {
        let bytes = frame::encode(side, drive);
        self.bus.write(self.address, &bytes);
    }
}
