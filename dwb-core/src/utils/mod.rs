//! Utility re-exports and helper macros for the Differential Wheel Bot.
//!
//! This module re-exports core components, timing, drive math, and connection
//! controllers:
//!
//! - `connection`: line-oriented command intake
//! - `controllers`: wheel and LED controllers for robotics hardware
//! - `math`: differential-drive wheel mapping
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod connection;
pub mod controllers;
pub mod math;

pub use connection::intake::forward as intake;
pub use controllers::SystemController;
pub use embassy_time::*;
#[doc(hidden)]
pub use static_cell as __static_cell;

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: $crate::utils::__static_cell::StaticCell<$t> =
            $crate::utils::__static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
