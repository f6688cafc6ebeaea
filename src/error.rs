//! # Error Types
//!
//! This module defines error types used throughout the gatito library.

use thiserror::Error;

/// Main error type for gatito operations
#[derive(Debug, Error)]
pub enum GatitoError {
    /// Bitmap dimensions the packer cannot handle (width not a multiple
    /// of 8, mixed widths within one job)
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// Out-of-range command parameter, rejected before any transport write
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Operation attempted after the session reached a terminal state
    #[error("Session closed")]
    SessionClosed,

    /// Malformed inbound notification frame. The session logs and drops
    /// these; only the decode functions themselves return them.
    #[error("Notification decode error: {0}")]
    NotificationDecode(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
