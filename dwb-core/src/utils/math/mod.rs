//! Math utilities for the Differential Wheel Bot.
//!
//! This module maps body motion onto the left and right wheel commands.

pub mod drive;
