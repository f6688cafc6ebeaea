//! # Cat Printer Protocol Implementation
//!
//! This module provides low-level command builders and the codec for the
//! binary protocol spoken by GB01/GB02/GT01-family cat thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Frame format, CRC-8, and per-command byte builders
//! - [`codec`]: [`DeviceCommand`] values and validated encoding
//! - [`notification`]: Decoding of inbound device status frames
//!
//! ## Usage Example
//!
//! ```
//! use gatito::protocol::{codec::{CommandCodec, DeviceCommand}, commands};
//!
//! let codec = CommandCodec::new(48);
//!
//! // Everything the printer hears is a framed command:
//! let bytes = codec.encode(&DeviceCommand::Feed { lines: 16 })?;
//! assert_eq!(&bytes[..2], &commands::FRAME_MAGIC);
//! assert_eq!(*bytes.last().unwrap(), commands::FRAME_TAIL);
//! # Ok::<(), gatito::GatitoError>(())
//! ```
//!
//! ## Protocol Reference
//!
//! The frame format and command ids follow the firmware of the GB01
//! printer family, as reverse-engineered by the cat-printer community.

pub mod codec;
pub mod commands;
pub mod notification;

pub use codec::{CommandCodec, DeviceCommand};
pub use notification::DeviceStatus;
