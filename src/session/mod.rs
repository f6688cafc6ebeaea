//! # Printer Session
//!
//! A [`PrinterSession`] orchestrates one physical print job over one
//! exclusively-owned transport: parameter setup, layer iteration with
//! per-layer offsets, the draw loop with blank-run compression, the
//! completion feed, and guaranteed teardown.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──► Preparing ──► Drawing ──► Finishing ──► Closed
//!   │          │            │            │
//!   └──────────┴────────────┴────────────┴───────► Failed
//! ```
//!
//! Transitions are strictly forward; `Closed` and `Failed` are terminal
//! and reachable from anywhere. Whatever path the session takes out, the
//! teardown sequence — stop notifications, disconnect — runs exactly
//! once, with a `Drop` backstop for sessions abandoned mid-job.
//!
//! ## Command Flow
//!
//! The session is the sole writer to the transport. Commands are issued
//! strictly in call order and each command's bytes are written completely
//! before the next begins — the link has no reassembly of its own.
//! Device notifications arrive on the transport's callback thread and
//! only ever post into an inbox here; the session drains it between
//! commands, so session state stays single-threaded.
//!
//! ## Modules
//!
//! - [`job`]: [`PrintJob`], [`ContentLayer`], [`LayerKind`]

pub mod job;

pub use job::{ContentLayer, LayerKind, PrintJob};

use std::sync::mpsc::{self, Receiver};

use log::{debug, warn};

use crate::error::GatitoError;
use crate::printer::PrinterConfig;
use crate::protocol::codec::{CommandCodec, DeviceCommand};
use crate::protocol::notification::{self, DeviceStatus};
use crate::raster::{BlankRunCompressor, PackedLine};
use crate::transport::Transport;

/// Where a session is in its lifecycle. See the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Preparing,
    Drawing,
    Finishing,
    Closed,
    Failed,
}

impl SessionState {
    /// Terminal states accept no further operations.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Failed)
    }
}

/// Per-job print parameters, normally taken from the UI layer.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    /// Draw speed while printing ink.
    pub speed: u8,
    /// Thermal energy (dot darkness).
    pub energy: u16,
    /// Trailing feed so the content clears the tear bar.
    pub finish_feed: u16,
}

impl PrintOptions {
    /// Defaults for a printer model.
    pub fn from_config(config: &PrinterConfig) -> Self {
        Self {
            speed: config.draw_speed,
            energy: config.energy,
            finish_feed: config.finish_feed,
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self::from_config(&PrinterConfig::default())
    }
}

/// # Printer Session
///
/// Drives one print job over an exclusively-owned [`Transport`]. See the
/// module docs for the state machine and ordering guarantees.
///
/// ## Example
///
/// ```
/// use gatito::printer::PrinterConfig;
/// use gatito::raster::RasterBitmap;
/// use gatito::session::{ContentLayer, PrintJob, PrinterSession, PrintOptions};
/// use gatito::transport::MockTransport;
///
/// let config = PrinterConfig::GB01;
/// let bitmap = RasterBitmap::from_luma(384, 1, vec![0x00; 384])?;
/// let job = PrintJob::new(vec![ContentLayer::image(bitmap)])?;
///
/// let mut session = PrinterSession::new(MockTransport::new(), config)?;
/// session.print(&job, &PrintOptions::from_config(&config))?;
/// # Ok::<(), gatito::GatitoError>(())
/// ```
pub struct PrinterSession<T: Transport> {
    transport: T,
    codec: CommandCodec,
    config: PrinterConfig,
    state: SessionState,
    inbox: Receiver<Vec<u8>>,
    /// Speed restored after a fast-feed excursion; set by `prepare`.
    draw_speed: u8,
    last_status: Option<DeviceStatus>,
    torn_down: bool,
}

impl<T: Transport> PrinterSession<T> {
    /// Take ownership of a connected transport and register the
    /// notification handler. Registration happens here, before any
    /// command can be sent.
    pub fn new(mut transport: T, config: PrinterConfig) -> Result<Self, GatitoError> {
        let (tx, inbox) = mpsc::channel::<Vec<u8>>();
        if let Err(e) = transport.subscribe(Box::new(move |frame| {
            // Session may already be gone; a dead inbox just drops frames.
            let _ = tx.send(frame.to_vec());
        })) {
            let _ = transport.disconnect();
            return Err(e);
        }

        Ok(Self {
            transport,
            codec: CommandCodec::new(config.width_bytes),
            config,
            state: SessionState::Idle,
            inbox,
            draw_speed: config.draw_speed,
            last_status: None,
            torn_down: false,
        })
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Most recent device status, after draining any queued notifications.
    pub fn last_status(&mut self) -> Option<DeviceStatus> {
        self.drain_notifications();
        self.last_status
    }

    // ========================================================================
    // COMMAND OPERATIONS (1:1 with DeviceCommand)
    // ========================================================================

    /// Establish print parameters. Must be the first operation.
    pub fn prepare(&mut self, speed: u8, energy: u16) -> Result<(), GatitoError> {
        self.ensure_live()?;
        if self.state != SessionState::Idle {
            return Err(self.fail(GatitoError::InvalidCommand(
                "prepare is only valid on a fresh session".into(),
            )));
        }
        self.state = SessionState::Preparing;
        self.draw_speed = speed;
        self.send(DeviceCommand::Prepare { speed, energy })
    }

    /// Change feed/draw speed. Valid between any two commands of a
    /// prepared session.
    pub fn set_speed(&mut self, speed: u8) -> Result<(), GatitoError> {
        self.ensure_prepared()?;
        self.send(DeviceCommand::SetSpeed { speed })
    }

    /// Advance the paper without drawing.
    pub fn feed(&mut self, lines: u16) -> Result<(), GatitoError> {
        self.ensure_prepared()?;
        self.state = SessionState::Drawing;
        self.send(DeviceCommand::Feed { lines })
    }

    /// Reverse the paper without drawing.
    pub fn retract(&mut self, lines: u16) -> Result<(), GatitoError> {
        self.ensure_prepared()?;
        self.state = SessionState::Drawing;
        self.send(DeviceCommand::Retract { lines })
    }

    /// Print one packed raster line.
    pub fn draw(&mut self, line: PackedLine) -> Result<(), GatitoError> {
        self.ensure_prepared()?;
        self.state = SessionState::Drawing;
        self.send(DeviceCommand::Draw { line })
    }

    /// Final feed and teardown. The session is `Closed` afterwards and
    /// accepts no further operations.
    pub fn finish(&mut self, lines: u16) -> Result<(), GatitoError> {
        self.ensure_prepared()?;
        self.state = SessionState::Finishing;
        self.send(DeviceCommand::Finish { lines })?;
        self.drain_notifications();
        self.teardown();
        self.state = SessionState::Closed;
        debug!("session closed normally");
        Ok(())
    }

    // ========================================================================
    // JOB DRIVER
    // ========================================================================

    /// Print a whole job: prepare, iterate layers with offset handling and
    /// blank-run compression, finish, tear down.
    ///
    /// Blank runs are drained at the fast feed speed instead of being
    /// drawn; the run counter carries across contiguous layers and is
    /// flushed before any explicit offset. Trailing blanks fold into the
    /// finish feed.
    pub fn print(&mut self, job: &PrintJob, options: &PrintOptions) -> Result<(), GatitoError> {
        self.ensure_live()?;
        if let Some(width) = job.width() {
            if width != u32::from(self.config.width_dots) {
                return Err(self.fail(GatitoError::InvalidDimension(format!(
                    "job width {} does not match {} head width {}",
                    width, self.config.name, self.config.width_dots
                ))));
            }
        }

        self.prepare(options.speed, options.energy)?;

        let mut compressor = BlankRunCompressor::new();
        for layer in job.layers() {
            if layer.offset != 0 {
                // The offset implies its own feed semantics; flush the
                // pending blank run first so ordering is preserved.
                let pending = compressor.take_pending();
                if pending > 0 {
                    self.fast_feed(pending)?;
                }
                self.apply_offset(layer.offset)?;
            }
            for line in layer.bitmap.lines() {
                if let Some(step) = compressor.push(line) {
                    if step.blank_before > 0 {
                        self.fast_feed(step.blank_before)?;
                    }
                    self.draw(step.line)?;
                }
            }
        }

        let trailing = u64::from(compressor.take_pending()) + u64::from(options.finish_feed);
        let trailing = self.capped(trailing)?;
        self.finish(trailing)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Skip blank paper: fast speed, feed, restore draw speed.
    fn fast_feed(&mut self, lines: u32) -> Result<(), GatitoError> {
        let lines = self.capped(u64::from(lines))?;
        self.set_speed(self.config.feed_speed)?;
        self.feed(lines)?;
        self.set_speed(self.draw_speed)
    }

    /// Apply a layer offset: fast speed, feed or retract, restore.
    fn apply_offset(&mut self, offset: i32) -> Result<(), GatitoError> {
        let magnitude = self.capped(u64::from(offset.unsigned_abs()))?;
        self.set_speed(self.config.feed_speed)?;
        if offset > 0 {
            self.feed(magnitude)?;
        } else {
            self.retract(magnitude)?;
        }
        self.set_speed(self.draw_speed)
    }

    /// Enforce the device cap on line counts; never silently truncate.
    fn capped(&mut self, lines: u64) -> Result<u16, GatitoError> {
        u16::try_from(lines).map_err(|_| {
            self.fail(GatitoError::InvalidCommand(format!(
                "feed of {} lines exceeds the device cap of {}",
                lines,
                u16::MAX
            )))
        })
    }

    fn ensure_live(&self) -> Result<(), GatitoError> {
        if self.state.is_terminal() {
            return Err(GatitoError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_prepared(&mut self) -> Result<(), GatitoError> {
        self.ensure_live()?;
        if self.state == SessionState::Idle {
            return Err(self.fail(GatitoError::InvalidCommand(
                "prepare must be called before any other command".into(),
            )));
        }
        Ok(())
    }

    /// Encode and write one command, draining queued notifications first.
    /// Encode failures never reach the transport; either kind of failure
    /// moves the session to `Failed` and runs teardown.
    fn send(&mut self, command: DeviceCommand) -> Result<(), GatitoError> {
        self.drain_notifications();
        let bytes = match self.codec.encode(&command) {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = self.transport.write(&bytes) {
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Pull every queued notification frame out of the inbox. Decode
    /// failures are logged and dropped; they are telemetry, not flow
    /// control.
    fn drain_notifications(&mut self) {
        while let Ok(frame) = self.inbox.try_recv() {
            match notification::decode(&frame) {
                Ok(status) => {
                    debug!("printer status: {:?}", status);
                    self.last_status = Some(status);
                }
                Err(e) => warn!("dropping notification frame: {}", e),
            }
        }
    }

    /// Move to `Failed`, tear down, and hand the error back for
    /// propagation.
    fn fail(&mut self, err: GatitoError) -> GatitoError {
        warn!("session failed: {}", err);
        self.state = SessionState::Failed;
        self.teardown();
        err
    }

    /// Stop notifications and release the transport. Runs exactly once
    /// no matter how many exit paths reach it.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Err(e) = self.transport.unsubscribe() {
            warn!("unsubscribe during teardown failed: {}", e);
        }
        if let Err(e) = self.transport.disconnect() {
            warn!("disconnect during teardown failed: {}", e);
        }
    }
}

impl<T: Transport> Drop for PrinterSession<T> {
    fn drop(&mut self) {
        // Backstop for sessions abandoned before finish().
        self.teardown();
    }
}

// ============================================================================
// TESTS
// ============================================================================
