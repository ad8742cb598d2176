//! Differential-drive wheel mapping.
//!
//! Maps a body-level [`MotionState`] and speed onto the per-wheel [`Drive`]
//! commands for the left and right motors.
//!
//! # Example
//! ```rust
//! use dwb_core::utils::controllers::{Drive, MotionState};
//! use dwb_core::utils::math::drive::{wheel_drives, TurnRatio};
//!
//! let (left, right) = wheel_drives(MotionState::TurnLeft, 101, TurnRatio::HALF);
//! assert_eq!(left, Drive::forward(50));
//! assert_eq!(right, Drive::forward(101));
//! ```

use crate::utils::controllers::{Drive, MotionState};

/// Inner-wheel speed ratio used for turns.
///
/// Not derived from any turning radius; the inner wheel simply runs at
/// `speed * num / den`, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRatio {
    pub num: u8,
    pub den: u8,
}

impl TurnRatio {
    /// Inner wheel at half speed.
    pub const HALF: TurnRatio = TurnRatio { num: 1, den: 2 };

    /// Build a ratio, clamped to `num <= den` and `den >= 1`.
    pub fn new(
        num: u8,
        den: u8,
    ) -> Self {
        let den = den.max(1);
        TurnRatio {
            num: num.min(den),
            den,
        }
    }

    /// Inner wheel speed for an outer wheel running at `speed`.
    pub fn inner(
        self,
        speed: u8,
    ) -> u8 {
        let den = u16::from(self.den.max(1));
        let inner = u16::from(speed) * u16::from(self.num) / den;
        inner.min(u16::from(speed)) as u8
    }
}

impl Default for TurnRatio {
    fn default() -> Self {
        TurnRatio::HALF
    }
}

/// Compute `(left, right)` wheel drives for a motion state.
pub fn wheel_drives(
    state: MotionState,
    speed: u8,
    ratio: TurnRatio,
) -> (Drive, Drive) {
    match state {
        MotionState::Stopped => (Drive::Stop, Drive::Stop),
        MotionState::Forward => (Drive::forward(speed), Drive::forward(speed)),
        MotionState::Backward => (Drive::backward(speed), Drive::backward(speed)),
        MotionState::TurnLeft => (Drive::forward(ratio.inner(speed)), Drive::forward(speed)),
        MotionState::TurnRight => (Drive::forward(speed), Drive::forward(ratio.inner(speed))),
        MotionState::RotateLeft => (Drive::backward(speed), Drive::forward(speed)),
        MotionState::RotateRight => (Drive::forward(speed), Drive::backward(speed)),
    }
}
