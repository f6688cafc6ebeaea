//! # Mock Transport
//!
//! An in-memory [`Transport`] for tests and dry runs: records every
//! write, counts disconnects, can inject write failures at a chosen
//! point, and lets a test push notification frames through the
//! subscribed handler as if the device had sent them.
//!
//! The mock is a cheap clonable handle over shared state, so a test can
//! keep one handle for inspection while the session owns another.
//!
//! ## Example
//!
//! ```
//! use gatito::transport::{MockTransport, Transport};
//!
//! let mut transport = MockTransport::new();
//! let probe = transport.clone();
//!
//! transport.write(&[0x51, 0x78])?;
//! assert_eq!(probe.writes(), vec![vec![0x51, 0x78]]);
//! # Ok::<(), gatito::GatitoError>(())
//! ```

use std::sync::{Arc, Mutex};

use super::{NotificationHandler, Transport};
use crate::error::GatitoError;

#[derive(Default)]
struct Shared {
    writes: Vec<Vec<u8>>,
    handler: Option<NotificationHandler>,
    disconnects: usize,
    fail_after_writes: Option<usize>,
}

/// In-memory transport. See the module docs.
#[derive(Clone, Default)]
pub struct MockTransport {
    shared: Arc<Mutex<Shared>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `write` fail once `n` writes have been accepted.
    pub fn fail_after_writes(&self, n: usize) {
        self.shared.lock().unwrap().fail_after_writes = Some(n);
    }

    /// Every accepted write, in order, one entry per `write` call.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.shared.lock().unwrap().writes.clone()
    }

    /// All accepted bytes concatenated into one stream.
    pub fn byte_stream(&self) -> Vec<u8> {
        self.shared.lock().unwrap().writes.concat()
    }

    /// How many times `disconnect` has been called.
    pub fn disconnect_count(&self) -> usize {
        self.shared.lock().unwrap().disconnects
    }

    /// Whether a notification handler is currently registered.
    pub fn is_subscribed(&self) -> bool {
        self.shared.lock().unwrap().handler.is_some()
    }

    /// Deliver a notification frame to the subscribed handler, as the
    /// device would. Silently dropped when nothing is subscribed.
    pub fn push_notification(&self, frame: &[u8]) {
        let mut shared = self.shared.lock().unwrap();
        if let Some(handler) = shared.handler.as_mut() {
            handler(frame);
        }
    }
}

impl Transport for MockTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), GatitoError> {
        let mut shared = self.shared.lock().unwrap();
        if let Some(limit) = shared.fail_after_writes {
            if shared.writes.len() >= limit {
                return Err(GatitoError::Transport("injected write failure".into()));
            }
        }
        shared.writes.push(bytes.to_vec());
        Ok(())
    }

    fn subscribe(&mut self, handler: NotificationHandler) -> Result<(), GatitoError> {
        self.shared.lock().unwrap().handler = Some(handler);
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), GatitoError> {
        self.shared.lock().unwrap().handler = None;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), GatitoError> {
        self.shared.lock().unwrap().disconnects += 1;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
