// src/common/error.rs

use std::fmt::Debug;

/// Error from interpreting a single received line.
///
/// Covers framing and field extraction only; device-level conditions (fault
/// statuses, low battery) live in [`Cl200Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing arrived before the channel timeout.
    #[error("empty response line")]
    Empty,

    /// Line does not open with STX.
    #[error("response line does not start with STX (found {found:#04x})")]
    MissingStx { found: u8 },

    /// Line is shorter than the field being read requires.
    #[error("response line too short: needed {needed} bytes, got {got}")]
    TooShort { needed: usize, got: usize },

    /// Mantissa characters did not form a base-10 number.
    #[error("invalid mantissa digits")]
    InvalidMantissa,

    /// Exponent position held a non-digit.
    #[error("invalid exponent character {found:?}")]
    InvalidExponent { found: char },
}

/// Why the session handshake gave up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandshakeFailure {
    /// The PC-connect acknowledge never matched the expected frame.
    #[error("PC-connect acknowledge mismatch after {attempts} attempts; check the USB cable")]
    ConnectMismatch { attempts: u8 },

    /// EXT mode kept reporting that hold status was not established.
    #[error("hold status not established after {attempts} attempts")]
    HoldNotEstablished { attempts: u8 },
}

/// Top-level error taxonomy for a CL-200A session.
///
/// Fatal conditions abort the current operation; non-fatal device conditions
/// are carried on [`Measurement`](crate::common::response::Measurement)
/// instead of being raised.
#[derive(Debug, thiserror::Error)]
pub enum Cl200Error<E = ()>
where
    E: Debug,
{
    /// Underlying channel I/O error.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A received line could not be interpreted.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The connect or arm handshake did not complete.
    #[error("handshake failed: {0}")]
    Handshake(HandshakeFailure),

    /// Device-level fault reported in the status byte. No retry is
    /// meaningful; the meter must be switched off and back on.
    #[error("device fault (status {status:?}); switch the CL-200A off and back on")]
    DeviceFault { status: char },

    /// Battery too low for a usable measurement. Change the batteries or use
    /// the AC adapter.
    #[error("battery low; change the batteries or use the AC adapter")]
    LowBattery,

    /// `measure` was called before the session reached EXT mode.
    #[error("session is not armed for EXT measurements")]
    NotArmed,

    /// No attached device answered the PC-connect handshake.
    #[error("no CL-200A answered on any candidate serial port")]
    NoDeviceFound,
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let e = ParseError::TooShort { needed: 15, got: 7 };
        assert_eq!(
            e.to_string(),
            "response line too short: needed 15 bytes, got 7"
        );
    }

    #[test]
    fn test_device_fault_names_the_remedy() {
        let e: Cl200Error = Cl200Error::DeviceFault { status: '2' };
        assert!(e.to_string().contains("switch the CL-200A off and back on"));
    }

    #[test]
    fn test_parse_error_converts() {
        let e: Cl200Error = ParseError::Empty.into();
        assert!(matches!(e, Cl200Error::Parse(ParseError::Empty)));
    }
}
