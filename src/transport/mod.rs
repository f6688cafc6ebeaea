//! # Printer Transport Layer
//!
//! This module abstracts the byte channel between a session and the
//! physical printer. The protocol core needs nothing from a transport
//! beyond "ordered, reliable-enough byte delivery with asynchronous
//! inbound notifications", so any backend satisfying [`Transport`] works.
//!
//! ## Available Transports
//!
//! - [`rfcomm`]: Bluetooth RFCOMM for wireless printing (Linux)
//! - [`mock`]: In-memory transport for tests and simulation
//!
//! ## Ownership
//!
//! A transport is exclusively owned by one [`PrinterSession`] for its
//! lifetime. The session guarantees `unsubscribe` and `disconnect` run on
//! every exit path; implementations must treat a repeated `disconnect`
//! (and a disconnect without a prior connect) as a no-op, never an error.
//!
//! [`PrinterSession`]: crate::session::PrinterSession

pub mod mock;
pub mod rfcomm;

use crate::error::GatitoError;

pub use mock::MockTransport;
pub use rfcomm::RfcommTransport;

/// Handler invoked with each raw inbound notification frame.
///
/// Runs on the transport's delivery thread; implementations of the
/// session post into an inbox rather than touching state here.
pub type NotificationHandler = Box<dyn FnMut(&[u8]) + Send>;

/// A bidirectional byte channel to a printer.
pub trait Transport {
    /// Write one complete command byte-sequence.
    ///
    /// The call returns once the transport has accepted the bytes (not
    /// once the device acknowledged them). Implementations must not
    /// interleave bytes from concurrent writes; sessions serialize their
    /// calls, so a plain sequential write satisfies this.
    fn write(&mut self, bytes: &[u8]) -> Result<(), GatitoError>;

    /// Register the handler for inbound notification frames.
    fn subscribe(&mut self, handler: NotificationHandler) -> Result<(), GatitoError>;

    /// Deregister the notification handler. No-op when nothing is
    /// subscribed.
    fn unsubscribe(&mut self) -> Result<(), GatitoError>;

    /// Release the connection. Idempotent: double-disconnect and
    /// disconnect-without-connect are both no-ops.
    fn disconnect(&mut self) -> Result<(), GatitoError>;
}
