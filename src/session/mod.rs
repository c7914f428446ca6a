// src/session/mod.rs

//! Master-side session: drives the meter from PC-connect to EXT measurements.

mod handshake;
mod measure;

use std::time::Duration;

use crate::common::{
    channel::SerialChannel,
    command::Command,
    error::Cl200Error,
    frame::{self, Frame},
};

/// Connection progress of a session.
///
/// Monotonic except for one back-edge: a failed EXT-arm attempt with the
/// hold-not-established status re-enters `Held`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    PcConnected,
    Held,
    ExtArmed,
}

/// What to do when the PC-connect acknowledge never matches.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HandshakePolicy {
    /// Surface a handshake error and let the caller decide.
    #[default]
    Strict,
    /// Log a warning and continue in a degraded state.
    Lenient,
}

/// A single exclusive session with one meter over one channel.
///
/// Construction performs no I/O; [`connect`](Cl200Session::connect) runs the
/// handshake and [`measure`](Cl200Session::measure) takes readings once the
/// session is armed. The channel is owned for the session's lifetime and
/// closed when the session is dropped.
#[derive(Debug)]
pub struct Cl200Session<C: SerialChannel> {
    channel: C,
    state: SessionState,
    policy: HandshakePolicy,
}

impl<C: SerialChannel> Cl200Session<C> {
    pub fn new(channel: C) -> Self {
        Self::with_policy(channel, HandshakePolicy::default())
    }

    pub fn with_policy(channel: C, policy: HandshakePolicy) -> Self {
        Cl200Session {
            channel,
            state: SessionState::Disconnected,
            policy,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn policy(&self) -> HandshakePolicy {
        self.policy
    }

    /// Releases the underlying channel.
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Clears both buffers, writes one frame, and waits out its settle delay.
    ///
    /// The clears must precede every write: a stale byte from a prior
    /// exchange must never be read back as the current response.
    fn send_frame(&mut self, frame: &Frame, settle: Duration) -> Result<(), Cl200Error<C::Error>> {
        self.channel.reset_input_buffer().map_err(Cl200Error::Io)?;
        self.channel.reset_output_buffer().map_err(Cl200Error::Io)?;
        self.channel
            .write_all(frame.as_bytes())
            .map_err(Cl200Error::Io)?;
        self.channel.delay(settle);
        Ok(())
    }

    fn send_command(&mut self, command: Command, settle: Duration) -> Result<(), Cl200Error<C::Error>> {
        let frame = frame::encode(command);
        self.send_frame(&frame, settle)
    }

    fn read_line(&mut self) -> Result<Vec<u8>, Cl200Error<C::Error>> {
        self.channel.read_line().map_err(Cl200Error::Io)
    }
}
