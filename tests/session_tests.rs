//! # Session Sequence Tests
//!
//! These tests drive full print jobs through a [`MockTransport`] and
//! assert the exact ordered command stream the device would receive:
//! which frames, in which order, with which payloads.
//!
//! Frames are recovered from the raw byte stream with a small parser so
//! the assertions read at the command level rather than as byte soup.

use gatito::printer::PrinterConfig;
use gatito::protocol::commands;
use gatito::raster::RasterBitmap;
use gatito::session::{ContentLayer, PrintJob, PrintOptions, PrinterSession, SessionState};
use gatito::transport::MockTransport;
use pretty_assertions::assert_eq;

// ============================================================================
// FRAME PARSING HELPERS
// ============================================================================

/// One parsed wire frame: command id plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    cmd: u8,
    payload: Vec<u8>,
}

impl Frame {
    fn u16_payload(&self) -> u16 {
        u16::from_le_bytes([self.payload[0], self.payload[1]])
    }
}

/// Split a transport byte stream back into frames.
fn parse_frames(bytes: &[u8]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut at = 0;
    while at < bytes.len() {
        assert_eq!(&bytes[at..at + 2], &commands::FRAME_MAGIC, "frame magic at {}", at);
        let cmd = bytes[at + 2];
        let len = u16::from_le_bytes([bytes[at + 4], bytes[at + 5]]) as usize;
        let payload = bytes[at + 6..at + 6 + len].to_vec();
        assert_eq!(bytes[at + 6 + len], commands::crc8(&payload), "crc for cmd {:02X}", cmd);
        assert_eq!(bytes[at + 7 + len], commands::FRAME_TAIL, "tail for cmd {:02X}", cmd);
        frames.push(Frame { cmd, payload });
        at += 8 + len;
    }
    frames
}

/// The five frames every job opens with.
fn assert_prepare(frames: &[Frame], speed: u8, energy: u16) {
    assert_eq!(frames[0].cmd, commands::CMD_SET_DPI);
    assert_eq!(frames[1].cmd, commands::CMD_SET_SPEED);
    assert_eq!(frames[1].payload, vec![speed]);
    assert_eq!(frames[2].cmd, commands::CMD_SET_ENERGY);
    assert_eq!(frames[2].u16_payload(), energy);
    assert_eq!(frames[3].cmd, commands::CMD_APPLY_ENERGY);
    assert_eq!(frames[4].cmd, commands::CMD_LATTICE);
    assert_eq!(frames[4].payload, commands::LATTICE_START.to_vec());
}

/// The three frames every job closes with.
fn assert_finish(frames: &[Frame], lines: u16) {
    let n = frames.len();
    assert_eq!(frames[n - 3].cmd, commands::CMD_FEED);
    assert_eq!(frames[n - 3].u16_payload(), lines);
    assert_eq!(frames[n - 2].cmd, commands::CMD_LATTICE);
    assert_eq!(frames[n - 2].payload, commands::LATTICE_END.to_vec());
    assert_eq!(frames[n - 1].cmd, commands::CMD_GET_STATE);
}

// ============================================================================
// BITMAP HELPERS
// ============================================================================

const WIDTH: u32 = 384;
const PITCH: usize = 48;

/// Build a 384-wide bitmap from a per-row ink mask: `true` rows get one
/// ink dot at the given column, `false` rows stay white.
fn bitmap(rows: &[bool]) -> RasterBitmap {
    let mut luma = Vec::with_capacity(rows.len() * WIDTH as usize);
    for (r, &inked) in rows.iter().enumerate() {
        let mut row = vec![0xFFu8; WIDTH as usize];
        if inked {
            row[r % WIDTH as usize] = 0x00;
        }
        luma.extend(row);
    }
    RasterBitmap::from_luma(WIDTH, rows.len() as u32, luma).unwrap()
}

fn options() -> PrintOptions {
    PrintOptions { speed: 32, energy: 12000, finish_feed: 100 }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn print_job(job: &PrintJob) -> (Vec<Frame>, MockTransport) {
    init_logs();
    let transport = MockTransport::new();
    let probe = transport.clone();
    let mut session = PrinterSession::new(transport, PrinterConfig::GB01).unwrap();
    session.print(job, &options()).unwrap();
    (parse_frames(&probe.byte_stream()), probe)
}

// ============================================================================
// WHOLE-JOB SEQUENCES
// ============================================================================

#[test]
fn all_blank_job_feeds_once_and_never_draws() {
    let job = PrintJob::new(vec![ContentLayer::image(bitmap(&[false; 40]))]).unwrap();
    let (frames, _probe) = print_job(&job);

    assert_prepare(&frames, 32, 12000);
    // No draw, no speed excursion: the whole bitmap folds into the
    // finish feed.
    assert!(frames.iter().all(|f| f.cmd != commands::CMD_DRAW));
    assert_eq!(frames.len(), 5 + 3);
    assert_finish(&frames, 40 + 100);
}

#[test]
fn dense_job_draws_every_line_in_order_without_feeds() {
    let job = PrintJob::new(vec![ContentLayer::image(bitmap(&[true; 6]))]).unwrap();
    let (frames, _probe) = print_job(&job);

    assert_prepare(&frames, 32, 12000);
    let body = &frames[5..frames.len() - 3];
    assert_eq!(body.len(), 6);
    assert!(body.iter().all(|f| f.cmd == commands::CMD_DRAW));
    // Order check: each drawn line carries its row's marching dot.
    for (row, frame) in body.iter().enumerate() {
        assert_eq!(frame.payload.len(), PITCH);
        assert_eq!(frame.payload[row / 8], 1u8 << (row % 8), "row {}", row);
    }
    assert_finish(&frames, 100);
}

#[test]
fn positive_offset_feeds_at_fast_speed_before_layer() {
    let job = PrintJob::new(vec![
        ContentLayer::image(bitmap(&[true])).with_offset(5),
    ])
    .unwrap();
    let (frames, _probe) = print_job(&job);

    assert_prepare(&frames, 32, 12000);
    // SetSpeed(fast), Feed(5), SetSpeed(draw), then the layer.
    assert_eq!(frames[5].cmd, commands::CMD_SET_SPEED);
    assert_eq!(frames[5].payload, vec![8]);
    assert_eq!(frames[6].cmd, commands::CMD_FEED);
    assert_eq!(frames[6].u16_payload(), 5);
    assert_eq!(frames[7].cmd, commands::CMD_SET_SPEED);
    assert_eq!(frames[7].payload, vec![32]);
    assert_eq!(frames[8].cmd, commands::CMD_DRAW);
}

#[test]
fn negative_offset_retracts_instead_of_feeding() {
    let job = PrintJob::new(vec![
        ContentLayer::image(bitmap(&[true])).with_offset(-3),
    ])
    .unwrap();
    let (frames, _probe) = print_job(&job);

    assert_eq!(frames[5].cmd, commands::CMD_SET_SPEED);
    assert_eq!(frames[5].payload, vec![8]);
    assert_eq!(frames[6].cmd, commands::CMD_RETRACT);
    assert_eq!(frames[6].u16_payload(), 3);
    assert_eq!(frames[7].cmd, commands::CMD_SET_SPEED);
    assert_eq!(frames[7].payload, vec![32]);
}

/// The full two-layer scenario: blank compression inside a layer, the
/// pending run flushed at an offset boundary, the offset retract, and
/// the trailing finish feed.
#[test]
fn two_layer_job_with_offset_boundary() {
    let first = bitmap(&[false, false, true, false]);
    let second = bitmap(&[true, true]);
    let job = PrintJob::new(vec![
        ContentLayer::image(first),
        ContentLayer::image(second).with_offset(-2),
    ])
    .unwrap();
    let (frames, _probe) = print_job(&job);

    assert_prepare(&frames, 32, 12000);

    let expected_ids = [
        // first layer: two blanks compress into one fast feed
        (commands::CMD_SET_SPEED, 8u16),
        (commands::CMD_FEED, 2),
        (commands::CMD_SET_SPEED, 32),
        (commands::CMD_DRAW, 0),
        // boundary: trailing blank of layer 1 flushes first
        (commands::CMD_SET_SPEED, 8),
        (commands::CMD_FEED, 1),
        (commands::CMD_SET_SPEED, 32),
        // then the explicit offset
        (commands::CMD_SET_SPEED, 8),
        (commands::CMD_RETRACT, 2),
        (commands::CMD_SET_SPEED, 32),
        // second layer draws back to back
        (commands::CMD_DRAW, 0),
        (commands::CMD_DRAW, 0),
    ];

    let body = &frames[5..frames.len() - 3];
    assert_eq!(body.len(), expected_ids.len());
    for (frame, &(cmd, value)) in body.iter().zip(&expected_ids) {
        assert_eq!(frame.cmd, cmd);
        match cmd {
            commands::CMD_SET_SPEED => assert_eq!(frame.payload, vec![value as u8]),
            commands::CMD_FEED | commands::CMD_RETRACT => {
                assert_eq!(frame.u16_payload(), value)
            }
            _ => {}
        }
    }

    // No blank residue: finish carries only the configured feed.
    assert_finish(&frames, 100);
}

#[test]
fn contiguous_layers_merge_their_blank_runs() {
    // Layer 1 ends blank, layer 2 starts blank, no offset between them:
    // one merged feed covers both runs.
    let job = PrintJob::new(vec![
        ContentLayer::image(bitmap(&[true, false, false])),
        ContentLayer::image(bitmap(&[false, true])),
    ])
    .unwrap();
    let (frames, _probe) = print_job(&job);

    let body = &frames[5..frames.len() - 3];
    let ids: Vec<u8> = body.iter().map(|f| f.cmd).collect();
    assert_eq!(
        ids,
        vec![
            commands::CMD_DRAW,
            commands::CMD_SET_SPEED,
            commands::CMD_FEED,
            commands::CMD_SET_SPEED,
            commands::CMD_DRAW,
        ]
    );
    // 2 trailing blanks + 1 leading blank, as one feed.
    assert_eq!(body[2].u16_payload(), 3);
}

#[test]
fn zero_height_layer_is_a_no_op() {
    let empty = RasterBitmap::from_luma(WIDTH, 0, vec![]).unwrap();
    let job = PrintJob::new(vec![
        ContentLayer::image(empty),
        ContentLayer::image(bitmap(&[true])),
    ])
    .unwrap();
    let (frames, _probe) = print_job(&job);

    let body = &frames[5..frames.len() - 3];
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].cmd, commands::CMD_DRAW);
}

// ============================================================================
// FAILURE AND TEARDOWN
// ============================================================================

#[test]
fn draw_after_finish_fails_closed_without_reopening() {
    let transport = MockTransport::new();
    let probe = transport.clone();
    let mut session = PrinterSession::new(transport, PrinterConfig::GB01).unwrap();

    session.prepare(32, 12000).unwrap();
    session.finish(100).unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    let writes = probe.writes().len();
    assert!(matches!(
        session.draw(gatito::PackedLine::from_bytes(vec![0; PITCH])),
        Err(gatito::GatitoError::SessionClosed)
    ));
    assert_eq!(probe.writes().len(), writes);
    assert_eq!(probe.disconnect_count(), 1);
}

#[test]
fn write_failure_mid_drawing_disconnects_exactly_once() {
    init_logs();
    let transport = MockTransport::new();
    let probe = transport.clone();
    let mut session = PrinterSession::new(transport, PrinterConfig::GB01).unwrap();

    // Let prepare and one draw through, then cut the link.
    probe.fail_after_writes(2);
    let job = PrintJob::new(vec![ContentLayer::image(bitmap(&[true, true, true]))]).unwrap();
    let err = session.print(&job, &options()).unwrap_err();

    assert!(matches!(err, gatito::GatitoError::Transport(_)));
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(probe.disconnect_count(), 1);
    assert!(!probe.is_subscribed());

    drop(session);
    assert_eq!(probe.disconnect_count(), 1, "drop must not disconnect again");
}

#[test]
fn command_stream_is_identical_across_runs() {
    let job = PrintJob::new(vec![
        ContentLayer::image(bitmap(&[false, true, false])).with_offset(4),
    ])
    .unwrap();
    let (first, _) = print_job(&job);
    let (second, _) = print_job(&job);
    assert_eq!(first, second);
}
