//! # Bluetooth RFCOMM Transport
//!
//! This transport talks to a cat printer through a Linux RFCOMM device
//! node (`/dev/rfcommN`), which presents the printer's serial channel as
//! a TTY. Pairing and binding happen outside the library:
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Look for "GB01" / "GB02" / "GT01", note the address
//! [bluetooth]# pair XX:XX:XX:XX:XX:XX
//! $ sudo rfcomm bind 0 XX:XX:XX:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! The device is opened read-write and switched to raw mode so binary
//! frames pass through untouched: no CR/LF translation, no echo, no
//! canonical buffering, and crucially no XON/XOFF flow control — 0x11
//! and 0x13 both occur in raster data. Reads use a 100ms VTIME timeout
//! so the notification reader thread can observe its stop flag.
//!
//! ## Chunked Writes
//!
//! The link buffers very little; large draws are written in chunks with
//! a short delay between them, as the printer consumes lines at print
//! speed.
//!
//! ## Notifications
//!
//! `subscribe` spawns a reader thread that reassembles inbound bytes
//! into protocol frames (scanning for the `51 78` magic and walking the
//! length field) and hands each complete frame to the registered
//! handler.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use super::{NotificationHandler, Transport};
use crate::error::GatitoError;

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Chunk size for writes (bytes)
const CHUNK_SIZE: usize = 256;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 20;

/// # RFCOMM Printer Transport
///
/// Owns the device node plus the notification reader thread. Held by a
/// [`PrinterSession`](crate::session::PrinterSession), which drives the
/// `unsubscribe`/`disconnect` teardown on every exit path.
pub struct RfcommTransport {
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
    reader: Option<ReaderThread>,
}

struct ReaderThread {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl RfcommTransport {
    /// Open an RFCOMM connection to the printer.
    ///
    /// ## Errors
    ///
    /// Returns `Transport` if the device node does not exist, cannot be
    /// opened read-write (dialout group membership is the usual fix), or
    /// refuses raw-mode configuration.
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, GatitoError> {
        let path = device.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                GatitoError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd())?;

        Ok(Self {
            file: Some(file),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
            reader: None,
        })
    }

    /// Open with the default device path (/dev/rfcomm0)
    pub fn open_default() -> Result<Self, GatitoError> {
        Self::open(DEFAULT_DEVICE)
    }

    /// Set the chunk size for large writes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size;
    }

    /// Set the delay between chunks. Longer delays give the printer more
    /// time to burn through buffered lines.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    fn stop_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.stop.store(true, Ordering::Relaxed);
            if reader.handle.join().is_err() {
                warn!("notification reader thread panicked");
            }
        }
    }
}

impl Transport for RfcommTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), GatitoError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| GatitoError::Transport("transport is disconnected".into()))?;

        for chunk in bytes.chunks(self.chunk_size) {
            file.write_all(chunk)
                .map_err(|e| GatitoError::Transport(format!("Write failed: {}", e)))?;
            if bytes.len() > self.chunk_size && !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }
        file.flush()
            .map_err(|e| GatitoError::Transport(format!("Flush failed: {}", e)))
    }

    fn subscribe(&mut self, mut handler: NotificationHandler) -> Result<(), GatitoError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| GatitoError::Transport("transport is disconnected".into()))?;
        let mut reader_file = file
            .try_clone()
            .map_err(|e| GatitoError::Transport(format!("Failed to clone device fd: {}", e)))?;

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let mut pending: Vec<u8> = Vec::new();
            let mut buf = [0u8; 256];
            while !thread_stop.load(Ordering::Relaxed) {
                match reader_file.read(&mut buf) {
                    Ok(0) => {} // VTIME expired with nothing inbound
                    Ok(n) => {
                        pending.extend_from_slice(&buf[..n]);
                        for frame in extract_frames(&mut pending) {
                            handler(&frame);
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        debug!("notification read ended: {}", e);
                        break;
                    }
                }
            }
        });

        self.reader = Some(ReaderThread { stop, handle });
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), GatitoError> {
        self.stop_reader();
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), GatitoError> {
        self.stop_reader();
        self.file.take(); // closing the fd is the disconnect
        Ok(())
    }
}

impl Drop for RfcommTransport {
    fn drop(&mut self) {
        self.stop_reader();
    }
}

/// Pull complete protocol frames out of an inbound byte buffer.
///
/// Scans for the frame magic, walks the length field, and drains every
/// complete frame; bytes belonging to a partial frame stay buffered for
/// the next read. Garbage before a magic is discarded.
fn extract_frames(pending: &mut Vec<u8>) -> Vec<Vec<u8>> {
    use crate::protocol::commands::FRAME_MAGIC;

    let mut frames = Vec::new();
    loop {
        // Drop noise ahead of the next magic.
        let start = pending
            .windows(2)
            .position(|w| w == FRAME_MAGIC)
            .unwrap_or(pending.len().saturating_sub(1));
        pending.drain(..start);

        if pending.len() < 8 {
            return frames;
        }
        let len = u16::from_le_bytes([pending[4], pending[5]]) as usize;
        let total = len + 8;
        if pending.len() < total {
            return frames;
        }
        frames.push(pending.drain(..total).collect());
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY must go: 0x11 (XON) and 0x13 (XOFF) both occur in
/// packed raster data. VMIN=0/VTIME=1 makes blocking reads time out
/// after 100ms so the reader thread can notice its stop flag.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), GatitoError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(GatitoError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = 1;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(GatitoError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> Result<(), GatitoError> {
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands;

    fn state_frame() -> Vec<u8> {
        // printer→host GetDeviceState reply, flags clear
        vec![0x51, 0x78, 0xA3, 0x01, 0x01, 0x00, 0x00, 0x00, 0xFF]
    }

    #[test]
    fn test_extract_complete_frame() {
        let mut pending = state_frame();
        let frames = extract_frames(&mut pending);
        assert_eq!(frames, vec![state_frame()]);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_extract_keeps_partial_frame() {
        let mut pending = state_frame();
        pending.truncate(5);
        let kept = pending.clone();
        assert!(extract_frames(&mut pending).is_empty());
        assert_eq!(pending, kept);
    }

    #[test]
    fn test_extract_discards_leading_noise() {
        let mut pending = vec![0x00, 0x13, 0x37];
        pending.extend(state_frame());
        let frames = extract_frames(&mut pending);
        assert_eq!(frames, vec![state_frame()]);
    }

    #[test]
    fn test_extract_multiple_frames() {
        let mut pending = state_frame();
        pending.extend(state_frame());
        pending.extend(&state_frame()[..4]); // partial third
        let frames = extract_frames(&mut pending);
        assert_eq!(frames.len(), 2);
        assert_eq!(pending.len(), 4);
    }

    #[test]
    fn test_extract_respects_length_field() {
        // A longer payload than the state reply.
        let payload = [0x01, 0x02, 0x03];
        let mut frame = vec![0x51, 0x78, 0xA3, 0x01, 0x03, 0x00];
        frame.extend(payload);
        frame.push(commands::crc8(&payload));
        frame.push(0xFF);

        let mut pending = frame.clone();
        let frames = extract_frames(&mut pending);
        assert_eq!(frames, vec![frame]);
    }

    // Transport tests against a real device node require hardware;
    // session-level behavior is covered with MockTransport.
}
