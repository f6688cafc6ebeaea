//! # Command Codec
//!
//! This module defines [`DeviceCommand`], the tagged value for every
//! operation the printer understands, and [`CommandCodec`], which turns a
//! command into validated wire bytes.
//!
//! ## Validation Before Transport
//!
//! Encoding is where malformed parameters die: a zero speed, a zero
//! energy, or a draw line whose length does not match the head width all
//! fail with `InvalidCommand` *before* any transport write, so a
//! partially-invalid job never reaches the device.
//!
//! ## Purity
//!
//! `encode` is a pure function of the command value: no side effects, no
//! external state, and the same logical command always encodes to the
//! same bytes.
//!
//! ## Composite Commands
//!
//! Two logical commands expand to several frames, deterministically:
//!
//! - `Prepare` → SetDpi, SetSpeed, SetEnergy, ApplyEnergy, Lattice-start
//! - `Finish`  → Feed, Lattice-end, GetDeviceState
//!
//! The device consumes frames back to back, so a multi-frame encoding is
//! still one write from the session's point of view.

use super::commands;
use crate::error::GatitoError;
use crate::raster::PackedLine;

/// Every operation the printer understands, as an immutable value.
///
/// The codec never mutates a command; sessions build them and hand them
/// to [`CommandCodec::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Establish drawing parameters. MUST be the first command of a job.
    Prepare { speed: u8, energy: u16 },

    /// Change feed/draw speed between any two commands.
    SetSpeed { speed: u8 },

    /// Advance the paper without drawing.
    Feed { lines: u16 },

    /// Reverse the paper without drawing.
    Retract { lines: u16 },

    /// Print one packed raster line at the configured speed/energy.
    Draw { line: PackedLine },

    /// Final feed clearing the tear bar. Always the last command of a job.
    Finish { lines: u16 },
}

/// Encodes [`DeviceCommand`] values into wire frames for a fixed head width.
///
/// ## Example
///
/// ```
/// use gatito::protocol::{CommandCodec, DeviceCommand};
///
/// let codec = CommandCodec::new(48);
/// let bytes = codec.encode(&DeviceCommand::SetSpeed { speed: 8 })?;
/// assert_eq!(bytes, vec![0x51, 0x78, 0xBD, 0x00, 0x01, 0x00, 0x08, 0x38, 0xFF]);
/// # Ok::<(), gatito::GatitoError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CommandCodec {
    /// Expected draw-line length in bytes (head width / 8).
    width_bytes: u16,
}

impl CommandCodec {
    pub fn new(width_bytes: u16) -> Self {
        Self { width_bytes }
    }

    /// Encode one command into its exact wire bytes.
    ///
    /// ## Errors
    ///
    /// `InvalidCommand` for a zero speed or energy, or a draw line whose
    /// length differs from the configured head width.
    pub fn encode(&self, command: &DeviceCommand) -> Result<Vec<u8>, GatitoError> {
        match command {
            DeviceCommand::Prepare { speed, energy } => {
                Self::check_speed(*speed)?;
                Self::check_energy(*energy)?;
                let mut bytes = commands::set_dpi();
                bytes.extend(commands::set_speed(*speed));
                bytes.extend(commands::set_energy(*energy));
                bytes.extend(commands::apply_energy());
                bytes.extend(commands::lattice_start());
                Ok(bytes)
            }
            DeviceCommand::SetSpeed { speed } => {
                Self::check_speed(*speed)?;
                Ok(commands::set_speed(*speed))
            }
            DeviceCommand::Feed { lines } => Ok(commands::feed(*lines)),
            DeviceCommand::Retract { lines } => Ok(commands::retract(*lines)),
            DeviceCommand::Draw { line } => {
                if line.len() != self.width_bytes as usize {
                    return Err(GatitoError::InvalidCommand(format!(
                        "draw line is {} bytes, head expects {}",
                        line.len(),
                        self.width_bytes
                    )));
                }
                Ok(commands::draw(line.as_bytes()))
            }
            DeviceCommand::Finish { lines } => {
                let mut bytes = commands::feed(*lines);
                bytes.extend(commands::lattice_end());
                bytes.extend(commands::get_device_state());
                Ok(bytes)
            }
        }
    }

    fn check_speed(speed: u8) -> Result<(), GatitoError> {
        if speed == 0 {
            return Err(GatitoError::InvalidCommand("speed must be nonzero".into()));
        }
        Ok(())
    }

    fn check_energy(energy: u16) -> Result<(), GatitoError> {
        if energy == 0 {
            return Err(GatitoError::InvalidCommand("energy must be nonzero".into()));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
