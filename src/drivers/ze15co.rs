//! ZE15-CO carbon monoxide sensor protocol driver.
//!
//! The module speaks the sensor's Q&A mode over UART: a fixed 9-byte
//! read command, a 9-byte checksummed response.  Each poll is
//! self-contained — the request is written, and if a full response is
//! not already buffered the poll gives up immediately; the next
//! scheduled poll issues a brand-new request.  Nothing is retained
//! across polls.
//!
//! Response layout:
//!
//! ```text
//! ┌────────┬──────────┬───────────────────┬──────────┬───────────┬──────────┐
//! │ [0]    │ [1]      │ [2]               │ [3]      │ [4..=7]   │ [8]      │
//! │ 0xFF   │ reserved │ bit7: fault flag  │ value lo │ reserved  │ checksum │
//! │ header │          │ bits0-4: value hi │          │           │          │
//! └────────┴──────────┴───────────────────┴──────────┴───────────┴──────────┘
//! ```
//!
//! Checksum: 8-bit wrapping sum of bytes 1..=7, two's-complement
//! negated.  Concentration: `((b2 & 0x1F) * 256 + b3) * 0.1` ppm.
//!
//! If the stream loses alignment (a dropped byte, a stale partial
//! response), the driver scans the frame it read for the next header
//! byte and re-aligns on it rather than staying permanently offset.

use core::fmt;
use log::debug;

/// Request and response are both exactly this long.
pub const FRAME_LEN: usize = 9;

/// Every frame starts with this byte.
const HEADER: u8 = 0xFF;

/// Q&A-mode read command, checksum precomputed for the constant payload.
const READ_COMMAND: [u8; FRAME_LEN] = [0xFF, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79];

/// Closed set of poll outcomes other than a decoded value.
///
/// None of these is fatal: the owning adapter logs the error, applies
/// the fail-loud policy to the CO field, and the next scheduled poll
/// starts fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ze15coError {
    /// Response checksum did not match its payload.
    ChecksumMismatch,
    /// The sensor set its self-reported fault flag.
    SensorFailure,
    /// Fewer than [`FRAME_LEN`] bytes were buffered at poll time.
    NotAvailable,
    /// The request could not be written at all.
    WriteError,
}

impl fmt::Display for Ze15coError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::SensorFailure => write!(f, "sensor failure"),
            Self::NotAvailable => write!(f, "not available"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// The UART channel the sensor is wired to.
///
/// Models the serial semantics the driver needs and nothing more:
/// `write` returns the number of bytes accepted (0 means the port is
/// dead), `available` reports how many received bytes are buffered,
/// `read` drains up to `buf.len()` of them.
pub trait CoSerialBus {
    fn write(&mut self, bytes: &[u8]) -> usize;
    fn flush(&mut self);
    fn available(&self) -> usize;
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

/// Compute the protocol checksum over a frame's payload bytes (1..=7).
pub fn checksum(frame: &[u8; FRAME_LEN]) -> u8 {
    let mut sum: u8 = 0;
    for byte in &frame[1..FRAME_LEN - 1] {
        sum = sum.wrapping_add(*byte);
    }
    // Two's complement: ~sum + 1, wrapping.
    (!sum).wrapping_add(1)
}

fn verify_checksum(frame: &[u8; FRAME_LEN]) -> bool {
    checksum(frame) == frame[FRAME_LEN - 1]
}

/// ZE15-CO driver over a [`CoSerialBus`].
pub struct Ze15co<B: CoSerialBus> {
    bus: B,
}

impl<B: CoSerialBus> Ze15co<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// One poll: write the read command, decode the response if a full
    /// frame is already buffered.
    ///
    /// Never blocks.  `Err(NotAvailable)` is a normal, frequent
    /// outcome — the sensor answers on its own schedule and the next
    /// poll picks the answer up.
    pub fn read_co(&mut self) -> Result<f32, Ze15coError> {
        if self.bus.write(&READ_COMMAND) == 0 {
            return Err(Ze15coError::WriteError);
        }
        self.bus.flush();

        if self.bus.available() < FRAME_LEN {
            return Err(Ze15coError::NotAvailable);
        }

        let mut response = [0u8; FRAME_LEN];
        self.bus.read(&mut response);

        if response[0] != HEADER && !self.resync(&mut response) {
            return Err(Ze15coError::NotAvailable);
        }

        if !verify_checksum(&response) {
            return Err(Ze15coError::ChecksumMismatch);
        }

        if response[2] >> 7 != 0 {
            return Err(Ze15coError::SensorFailure);
        }

        let raw = u16::from(response[2] & 0x1F) * 256 + u16::from(response[3]);
        Ok(f32::from(raw) * 0.1)
    }

    /// Re-align a frame that does not start with the header byte.
    ///
    /// Scans the frame for the next `0xFF`, shifts the tail to the
    /// front and tops the frame up from bytes already buffered.
    /// Returns `false` when no header is in sight or the tail of the
    /// re-aligned frame has not arrived yet — the garbage has been
    /// consumed either way, so a later poll starts aligned.
    fn resync(&mut self, frame: &mut [u8; FRAME_LEN]) -> bool {
        let Some(pos) = frame[1..].iter().position(|b| *b == HEADER).map(|p| p + 1) else {
            debug!("ZE15CO: no header in frame, discarding {} bytes", FRAME_LEN);
            return false;
        };

        debug!("ZE15CO: resynchronising, header found at offset {}", pos);
        frame.copy_within(pos.., 0);

        let missing = pos;
        if self.bus.available() < missing {
            return false;
        }
        self.bus.read(&mut frame[FRAME_LEN - missing..]);
        true
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
