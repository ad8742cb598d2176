//! Core drivers and utilities for the Differential Wheel Bot on no-std embedded platforms.
//!
//! For a runnable host build, see `dwb-app/mock-mcu`.
#![no_std]

pub mod utils;
