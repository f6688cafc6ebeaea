//! # Cat Printer Protocol Commands
//!
//! This module implements the frame format used by GB01/GB02/GT01-family
//! cat thermal printers over their BLE write-without-response channel.
//!
//! ## Frame Structure
//!
//! Every command travels in one frame:
//!
//! ```text
//! ┌──────┬──────┬─────┬─────┬────────┬─────────┬─────┬──────┐
//! │ 0x51 │ 0x78 │ cmd │ dir │ len LE │ payload │ crc │ 0xFF │
//! └──────┴──────┴─────┴─────┴────────┴─────────┴─────┴──────┘
//! ```
//!
//! - `dir` is 0x00 host→printer, 0x01 printer→host
//! - `len` is the payload length as little-endian u16
//! - `crc` is CRC-8 (polynomial 0x07, init 0x00) over the payload only
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Command Set
//!
//! | id   | Name           | Payload                   |
//! |------|----------------|---------------------------|
//! | 0xA0 | RetractPaper   | u16 line count            |
//! | 0xA1 | FeedPaper      | u16 line count            |
//! | 0xA2 | DrawBitmap     | one packed raster line    |
//! | 0xA3 | GetDeviceState | 0x00 query / status flags |
//! | 0xA4 | SetDpi         | 50 (200 dpi)              |
//! | 0xA6 | Lattice        | start/end magic bytes     |
//! | 0xAF | SetEnergy      | u16 energy                |
//! | 0xBD | SetSpeed       | u8 speed                  |
//! | 0xBE | ApplyEnergy    | 0x01                      |

// ============================================================================
// FRAME CONSTANTS
// ============================================================================

/// Every frame starts with these two magic bytes.
pub const FRAME_MAGIC: [u8; 2] = [0x51, 0x78];

/// Every frame ends with this byte.
pub const FRAME_TAIL: u8 = 0xFF;

/// Direction byte: host to printer.
pub const DIR_HOST: u8 = 0x00;

/// Direction byte: printer to host (notification frames).
pub const DIR_PRINTER: u8 = 0x01;

// ============================================================================
// COMMAND IDS
// ============================================================================

/// Retract paper backward by a u16 line count.
pub const CMD_RETRACT: u8 = 0xA0;

/// Feed paper forward by a u16 line count (no drawing).
pub const CMD_FEED: u8 = 0xA1;

/// Draw one packed raster line at the configured speed/energy.
pub const CMD_DRAW: u8 = 0xA2;

/// Query device state; the printer answers with a status flag frame.
pub const CMD_GET_STATE: u8 = 0xA3;

/// Select head resolution.
pub const CMD_SET_DPI: u8 = 0xA4;

/// Lattice control: brackets the drawing phase of a job.
pub const CMD_LATTICE: u8 = 0xA6;

/// Set thermal energy (u16, dot darkness).
pub const CMD_SET_ENERGY: u8 = 0xAF;

/// Set feed/draw speed (u8, smaller is faster).
pub const CMD_SET_SPEED: u8 = 0xBD;

/// Latch the previously set energy value into the head driver.
pub const CMD_APPLY_ENERGY: u8 = 0xBE;

// ============================================================================
// MAGIC PAYLOADS
// ============================================================================

/// Lattice payload that opens the drawing phase.
pub const LATTICE_START: [u8; 11] = [
    0xAA, 0x55, 0x17, 0x38, 0x44, 0x5F, 0x5F, 0x5F, 0x44, 0x38, 0x2C,
];

/// Lattice payload that closes the drawing phase.
pub const LATTICE_END: [u8; 10] = [
    0xAA, 0x55, 0x17, 0x00, 0x00, 0x00, 0x00, 0x17, 0x11, 0x00,
];

/// SetDpi payload: 50 selects the standard 200 dpi head mode.
pub const DPI_200: u8 = 50;

// ============================================================================
// CRC
// ============================================================================

/// CRC-8 over a payload (polynomial 0x07, init 0x00, no reflection).
///
/// ## Example
///
/// ```
/// use gatito::protocol::commands::crc8;
///
/// assert_eq!(crc8(&[]), 0x00);
/// assert_eq!(crc8(&[0x08]), 0x38);
/// ```
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

// ============================================================================
// FRAMING
// ============================================================================

/// Wrap a payload into a host→printer frame for the given command id.
///
/// ## Example
///
/// ```
/// use gatito::protocol::commands::{frame, CMD_SET_SPEED};
///
/// let bytes = frame(CMD_SET_SPEED, &[0x08]);
/// assert_eq!(bytes, vec![0x51, 0x78, 0xBD, 0x00, 0x01, 0x00, 0x08, 0x38, 0xFF]);
/// ```
pub fn frame(command: u8, payload: &[u8]) -> Vec<u8> {
    let len = u16_le(payload.len() as u16);
    let mut bytes = Vec::with_capacity(payload.len() + 8);
    bytes.extend(FRAME_MAGIC);
    bytes.push(command);
    bytes.push(DIR_HOST);
    bytes.extend(len);
    bytes.extend(payload);
    bytes.push(crc8(payload));
    bytes.push(FRAME_TAIL);
    bytes
}

// ============================================================================
// COMMAND BUILDERS
// ============================================================================

/// Feed paper forward by `lines` raster lines without drawing.
#[inline]
pub fn feed(lines: u16) -> Vec<u8> {
    frame(CMD_FEED, &u16_le(lines))
}

/// Retract paper backward by `lines` raster lines.
#[inline]
pub fn retract(lines: u16) -> Vec<u8> {
    frame(CMD_RETRACT, &u16_le(lines))
}

/// Transmit one packed raster line.
///
/// Length validation happens in [`codec`](super::codec); this builder
/// frames whatever it is given.
#[inline]
pub fn draw(line: &[u8]) -> Vec<u8> {
    frame(CMD_DRAW, line)
}

/// Set feed/draw speed. Smaller values are faster; the firmware treats
/// the byte as a per-line step delay.
#[inline]
pub fn set_speed(speed: u8) -> Vec<u8> {
    frame(CMD_SET_SPEED, &[speed])
}

/// Set thermal energy (dot darkness).
#[inline]
pub fn set_energy(energy: u16) -> Vec<u8> {
    frame(CMD_SET_ENERGY, &u16_le(energy))
}

/// Latch the configured energy into the head driver.
#[inline]
pub fn apply_energy() -> Vec<u8> {
    frame(CMD_APPLY_ENERGY, &[0x01])
}

/// Select the standard 200 dpi head mode.
#[inline]
pub fn set_dpi() -> Vec<u8> {
    frame(CMD_SET_DPI, &[DPI_200])
}

/// Open the drawing phase.
#[inline]
pub fn lattice_start() -> Vec<u8> {
    frame(CMD_LATTICE, &LATTICE_START)
}

/// Close the drawing phase.
#[inline]
pub fn lattice_end() -> Vec<u8> {
    frame(CMD_LATTICE, &LATTICE_END)
}

/// Ask the printer to report its state flags.
#[inline]
pub fn get_device_state() -> Vec<u8> {
    frame(CMD_GET_STATE, &[0x00])
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use gatito::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(384), [0x80, 0x01]); // head width in dots
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crc8_known_values() {
        assert_eq!(crc8(&[]), 0x00);
        assert_eq!(crc8(&[0x00]), 0x00);
        assert_eq!(crc8(&[0x08]), 0x38);
        assert_eq!(crc8(&[0x02, 0x00]), 0x2A);
    }

    #[test]
    fn test_frame_layout() {
        let bytes = frame(CMD_FEED, &[0x02, 0x00]);
        assert_eq!(
            bytes,
            vec![0x51, 0x78, 0xA1, 0x00, 0x02, 0x00, 0x02, 0x00, 0x2A, 0xFF]
        );
    }

    #[test]
    fn test_frame_empty_payload() {
        let bytes = frame(CMD_GET_STATE, &[]);
        assert_eq!(bytes, vec![0x51, 0x78, 0xA3, 0x00, 0x00, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn test_feed_little_endian_count() {
        let bytes = feed(0x0201);
        assert_eq!(bytes[2], CMD_FEED);
        assert_eq!(&bytes[6..8], &[0x01, 0x02]);
    }

    #[test]
    fn test_retract_command_id() {
        assert_eq!(retract(3)[2], CMD_RETRACT);
    }

    #[test]
    fn test_set_speed() {
        assert_eq!(
            set_speed(8),
            vec![0x51, 0x78, 0xBD, 0x00, 0x01, 0x00, 0x08, 0x38, 0xFF]
        );
    }

    #[test]
    fn test_set_energy_little_endian() {
        let bytes = set_energy(12000); // 0x2EE0
        assert_eq!(bytes[2], CMD_SET_ENERGY);
        assert_eq!(&bytes[6..8], &[0xE0, 0x2E]);
    }

    #[test]
    fn test_draw_carries_line_verbatim() {
        let line = [0xAA, 0x55, 0x00, 0xFF];
        let bytes = draw(&line);
        assert_eq!(bytes[2], CMD_DRAW);
        assert_eq!(&bytes[4..6], &u16_le(4));
        assert_eq!(&bytes[6..10], &line);
    }

    #[test]
    fn test_lattice_payloads() {
        let start = lattice_start();
        let end = lattice_end();
        assert_eq!(&start[6..17], &LATTICE_START);
        assert_eq!(&end[6..16], &LATTICE_END);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
    }

    #[test]
    fn test_same_command_encodes_identically() {
        assert_eq!(feed(100), feed(100));
        assert_eq!(set_energy(0x2EE0), set_energy(0x2EE0));
    }
}
