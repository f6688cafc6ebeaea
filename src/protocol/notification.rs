//! # Device Notifications
//!
//! The printer pushes status frames asynchronously on its notify
//! characteristic, using the same framing as outbound commands but with
//! direction byte 0x01. This module decodes those frames into
//! [`DeviceStatus`] values.
//!
//! Decode failures are not fatal anywhere in the crate: the session logs
//! and drops malformed frames (best-effort telemetry, not flow control).
//!
//! ## State Flags
//!
//! A `GetDeviceState` reply carries one flag byte:
//!
//! | bit  | meaning      |
//! |------|--------------|
//! | 0x01 | out of paper |
//! | 0x02 | cover open   |
//! | 0x04 | overheated   |
//! | 0x08 | low power    |
//! | 0x80 | busy         |
//!
//! All clear means ready.

use super::commands::{self, CMD_GET_STATE, DIR_PRINTER, FRAME_MAGIC, FRAME_TAIL};
use crate::error::GatitoError;

/// Decoded device status, fed back to the session between commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Idle and ready for commands.
    Ready,
    /// Still working through buffered lines.
    Busy,
    /// Paper roll exhausted.
    OutOfPaper,
    /// Cover open; the head is not engaged.
    CoverOpen,
    /// Head over temperature; the firmware throttles drawing.
    Overheated,
    /// Battery low.
    LowPower,
}

/// Status flag bits in a `GetDeviceState` reply.
mod flags {
    pub const OUT_OF_PAPER: u8 = 0x01;
    pub const COVER_OPEN: u8 = 0x02;
    pub const OVERHEATED: u8 = 0x04;
    pub const LOW_POWER: u8 = 0x08;
    pub const BUSY: u8 = 0x80;
}

/// Decode one inbound notification frame.
///
/// ## Errors
///
/// `NotificationDecode` for anything that is not a well-formed
/// printer→host `GetDeviceState` frame: bad magic, wrong direction,
/// truncated body, CRC mismatch, or an unknown command id.
///
/// ## Example
///
/// ```
/// use gatito::protocol::notification::{decode, DeviceStatus};
///
/// // Ready: state reply with all flags clear.
/// let frame = [0x51, 0x78, 0xA3, 0x01, 0x01, 0x00, 0x00, 0x00, 0xFF];
/// assert_eq!(decode(&frame)?, DeviceStatus::Ready);
/// # Ok::<(), gatito::GatitoError>(())
/// ```
pub fn decode(frame: &[u8]) -> Result<DeviceStatus, GatitoError> {
    if frame.len() < 8 {
        return Err(GatitoError::NotificationDecode(format!(
            "frame too short: {} bytes",
            frame.len()
        )));
    }
    if frame[0..2] != FRAME_MAGIC {
        return Err(GatitoError::NotificationDecode(format!(
            "bad magic: {:02X} {:02X}",
            frame[0], frame[1]
        )));
    }
    if frame[3] != DIR_PRINTER {
        return Err(GatitoError::NotificationDecode(format!(
            "unexpected direction byte: {:02X}",
            frame[3]
        )));
    }

    let len = u16::from_le_bytes([frame[4], frame[5]]) as usize;
    if frame.len() != len + 8 {
        return Err(GatitoError::NotificationDecode(format!(
            "length field {} does not match frame of {} bytes",
            len,
            frame.len()
        )));
    }
    let payload = &frame[6..6 + len];
    let crc = frame[6 + len];
    if crc != commands::crc8(payload) {
        return Err(GatitoError::NotificationDecode(format!(
            "crc mismatch: got {:02X}, computed {:02X}",
            crc,
            commands::crc8(payload)
        )));
    }
    if frame[7 + len] != FRAME_TAIL {
        return Err(GatitoError::NotificationDecode("missing frame tail".into()));
    }

    match frame[2] {
        CMD_GET_STATE => {
            let state = *payload.first().ok_or_else(|| {
                GatitoError::NotificationDecode("state reply with empty payload".into())
            })?;
            Ok(decode_state_flags(state))
        }
        other => Err(GatitoError::NotificationDecode(format!(
            "unknown notification command: {:02X}",
            other
        ))),
    }
}

/// Map a state flag byte to the most urgent status it reports.
///
/// Error conditions win over busy, busy over ready, so the session sees
/// the thing it would act on first.
fn decode_state_flags(state: u8) -> DeviceStatus {
    if state & flags::OUT_OF_PAPER != 0 {
        DeviceStatus::OutOfPaper
    } else if state & flags::COVER_OPEN != 0 {
        DeviceStatus::CoverOpen
    } else if state & flags::OVERHEATED != 0 {
        DeviceStatus::Overheated
    } else if state & flags::LOW_POWER != 0 {
        DeviceStatus::LowPower
    } else if state & flags::BUSY != 0 {
        DeviceStatus::Busy
    } else {
        DeviceStatus::Ready
    }
}

// ============================================================================
// TESTS
// ============================================================================
