//! Motor command frames for the two-channel motor driver.
//!
//! Every command the driver understands is a three byte register write:
//!
//! ```text
//! [motor selector, direction code, speed]
//! ```
//!
//! The selector picks the wheel, the direction code picks forward, backward or
//! stop, and the speed byte is the PWM magnitude. Stop frames always carry a
//! zero speed.

/// Selector byte for the left motor.
pub const MOTOR_LEFT: u8 = 0x00;
/// Selector byte for the right motor.
pub const MOTOR_RIGHT: u8 = 0x02;

/// Direction code for a moving wheel.
pub const DIR_MOVE: u8 = 0x00;
/// Reverse bit, combined with `DIR_MOVE` for backward motion.
pub const DIR_REVERSE: u8 = 0x01;
/// Direction code for a stopped wheel.
pub const DIR_STOP: u8 = 0x02;

/// Length of an encoded frame.
pub const FRAME_LEN: usize = 3;

/// Which wheel a frame addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSide {
    Left,
    Right,
}

impl WheelSide {
    /// Selector byte understood by the driver.
    pub const fn selector(self) -> u8 {
        match self {
            WheelSide::Left => MOTOR_LEFT,
            WheelSide::Right => MOTOR_RIGHT,
        }
    }
}

/// Rotation sense of a single wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What a single wheel is told to do.
///
/// `Stop` has no direction or speed, so a reverse bit or a non-zero speed can
/// never end up in a stop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    Move { direction: Direction, speed: u8 },
    Stop,
}

impl Drive {
    pub const fn forward(speed: u8) -> Self {
        Drive::Move {
            direction: Direction::Forward,
            speed,
        }
    }

    pub const fn backward(speed: u8) -> Self {
        Drive::Move {
            direction: Direction::Backward,
            speed,
        }
    }

    /// Direction code byte for this drive.
    pub const fn direction_code(self) -> u8 {
        match self {
            Drive::Move {
                direction: Direction::Forward,
                ..
            } => DIR_MOVE,
            Drive::Move {
                direction: Direction::Backward,
                ..
            } => DIR_MOVE | DIR_REVERSE,
            Drive::Stop => DIR_STOP,
        }
    }

    /// Speed byte for this drive (zero when stopped).
    pub const fn speed(self) -> u8 {
        match self {
            Drive::Move { speed, .. } => speed,
            Drive::Stop => 0,
        }
    }
}

/// Encode one wheel command into its wire frame.
pub const fn encode(
    side: WheelSide,
    drive: Drive,
) -> [u8; FRAME_LEN] {
    [side.selector(), drive.direction_code(), drive.speed()]
}
