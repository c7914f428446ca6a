// src/common/timing.rs

use std::time::Duration;

// Settle delays are device-specific: the meter needs quiet time on the line
// after most commands before it will act on the next one.

// === Handshake ===

/// Settle delay after the PC-connect request.
pub const CONNECT_SETTLE: Duration = Duration::from_millis(500);
/// Settle delay after the hold-mode command (no response is read).
pub const HOLD_SETTLE: Duration = Duration::from_millis(500);
/// Settle delay after the EXT-mode command.
pub const EXT_SETTLE: Duration = Duration::from_millis(125);

// === Measurement ===

/// Settle delay after the EXT trigger, before the readout request.
pub const TRIGGER_SETTLE: Duration = Duration::from_millis(500);
/// The readout request needs no settle; the response follows directly.
pub const READ_SETTLE: Duration = Duration::ZERO;

// === Bounds ===

/// Default channel read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
/// Attempt bound for the connect and arm steps. Fixed delay between
/// attempts, no backoff.
pub const MAX_ATTEMPTS: u8 = 2;
