// src/session/handshake.rs

//! The connect -> hold -> arm handshake.

use log::{debug, error, warn};

use super::{Cl200Session, HandshakePolicy, SessionState};
use crate::common::{
    channel::SerialChannel,
    command::Command,
    error::{Cl200Error, HandshakeFailure},
    frame::{self, ResponseLine},
    response::FATAL_STATUSES,
    timing,
};

/// EXT-mode status telling us hold was never established.
const STATUS_HOLD_MISSING: char = '4';

impl<C: SerialChannel> Cl200Session<C> {
    /// Runs the full handshake: PC-connect, hold, EXT arm.
    ///
    /// On success the session is in [`SessionState::ExtArmed`] and
    /// [`measure`](Cl200Session::measure) may be called.
    pub fn connect(&mut self) -> Result<(), Cl200Error<C::Error>> {
        self.pc_connect()?;
        self.hold()?;
        self.arm()
    }

    /// Step 1: switch the meter to PC connection mode (command 54).
    ///
    /// Sends the connect request and compares the reply against the encoded
    /// acknowledge frame, retrying once. What happens when both attempts
    /// mismatch depends on the session's [`HandshakePolicy`].
    pub(crate) fn pc_connect(&mut self) -> Result<(), Cl200Error<C::Error>> {
        let expected = frame::encode(Command::PcConnectResponse);

        for attempt in 1..=timing::MAX_ATTEMPTS {
            self.send_command(Command::PcConnectRequest, timing::CONNECT_SETTLE)?;
            let line = self.read_line()?;
            if expected.matched_by(&line) {
                debug!("PC-connect acknowledged (attempt {attempt})");
                self.state = SessionState::PcConnected;
                return Ok(());
            }
            debug!(
                "PC-connect acknowledge mismatch (attempt {attempt}/{})",
                timing::MAX_ATTEMPTS
            );
        }

        match self.policy {
            HandshakePolicy::Strict => Err(Cl200Error::Handshake(
                HandshakeFailure::ConnectMismatch {
                    attempts: timing::MAX_ATTEMPTS,
                },
            )),
            HandshakePolicy::Lenient => {
                warn!(
                    "PC-connect acknowledge mismatch after {} attempts; \
                     continuing degraded (check the USB cable)",
                    timing::MAX_ATTEMPTS
                );
                self.state = SessionState::PcConnected;
                Ok(())
            }
        }
    }

    /// Step 2: set hold status (command 55).
    ///
    /// Fire-and-forget by protocol design: no response is read or checked.
    /// Hold must be established before EXT mode can be set.
    pub(crate) fn hold(&mut self) -> Result<(), Cl200Error<C::Error>> {
        self.send_command(Command::HoldMode, timing::HOLD_SETTLE)?;
        self.state = SessionState::Held;
        Ok(())
    }

    /// Step 3: set EXT mode (command 40).
    ///
    /// Status `'4'` means hold was not established; hold is re-run and the
    /// arm retried, bounded to [`timing::MAX_ATTEMPTS`] total attempts.
    /// Statuses `'1'..='3'` are device faults requiring a power cycle.
    pub(crate) fn arm(&mut self) -> Result<(), Cl200Error<C::Error>> {
        for attempt in 1..=timing::MAX_ATTEMPTS {
            self.send_command(Command::SetExtTrigger, timing::EXT_SETTLE)?;
            let line = self.read_line()?;
            let status = ResponseLine::new(&line)?.status()?;
            match status {
                STATUS_HOLD_MISSING if attempt < timing::MAX_ATTEMPTS => {
                    debug!("EXT mode refused, hold not established; re-running hold");
                    self.hold()?;
                }
                STATUS_HOLD_MISSING => break,
                s if FATAL_STATUSES.contains(&s) => {
                    error!("EXT mode failed with device fault status {s}; power-cycle the meter");
                    return Err(Cl200Error::DeviceFault { status: s });
                }
                _ => {
                    debug!("EXT mode armed (attempt {attempt})");
                    self.state = SessionState::ExtArmed;
                    return Ok(());
                }
            }
        }

        Err(Cl200Error::Handshake(
            HandshakeFailure::HoldNotEstablished {
                attempts: timing::MAX_ATTEMPTS,
            },
        ))
    }
}
