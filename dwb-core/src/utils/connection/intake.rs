//! Line Command Intake
//!
//! Parses newline-delimited JSON `SystemCommand` messages (as sent over the
//! serial link or read from a script) and forwards them to the wheel and LED
//! channels. Blank lines and lines starting with `#` are skipped.
//!
//! ```json
//! {"ct":"w","wc":"forward","s":120}
//! {"ct":"l","lc":"b","n":3,"on":100,"off":50}
//! ```

use crate::utils::controllers::{SystemCommand, LED_CHANNEL, WHEEL_CHANNEL};

/// Errors that can occur when reading a command line.
#[derive(Debug)]
pub enum CommandError {
    /// The line is not a valid `SystemCommand`.
    Json(serde_json::Error),
}

impl From<serde_json::Error> for CommandError {
    fn from(error: serde_json::Error) -> Self {
        CommandError::Json(error)
    }
}

/// Parse one line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<SystemCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str::<SystemCommand>(line)?))
}

/// Parse one line and push the command onto its channel.
///
/// Returns the acknowledgement to send back to the peer.
pub async fn forward(line: &str) -> Result<&'static str, CommandError> {
    match parse_line(line) {
        Ok(Some(SystemCommand::W(wheel_cmd))) => {
            WHEEL_CHANNEL.send(wheel_cmd).await;
            Ok("Wheel command received and forwarded")
        }
        Ok(Some(SystemCommand::L(led_cmd))) => {
            LED_CHANNEL.send(led_cmd).await;
            Ok("LED command received and forwarded")
        }
        Ok(None) => Ok("Ignored"),
        Err(error) => {
            tracing::error!(?error, "error deserializing SystemCommand");
            Err(error)
        }
    }
}
