//! Module Exports
//!
//! This file exports the command intake used by the host link.
//!
//! # Modules
//! - `intake`: parses line-oriented JSON commands and forwards them to the
//!   controller channels.

/// Module for line-oriented command intake.
pub mod intake;
