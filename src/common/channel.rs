// src/common/channel.rs

//! Abstraction over the serial line.

use std::fmt::Debug;
use std::time::Duration;

/// Exclusive, blocking access to a configured serial port.
///
/// The protocol assumes strict request/response ordering: a channel must be
/// owned by exactly one session, and callers clear both buffers before every
/// write so a stale byte from a prior exchange is never read back as the
/// current response.
pub trait SerialChannel {
    /// Error type of the underlying transport.
    type Error: Debug;

    /// Writes all bytes of one frame.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads one line, CRLF included.
    ///
    /// Blocks until the terminator arrives or the port timeout elapses; a
    /// timeout yields whatever bytes did arrive (possibly none) rather than
    /// an error. Short lines surface later as parse errors.
    fn read_line(&mut self) -> Result<Vec<u8>, Self::Error>;

    /// Discards unread received bytes.
    fn reset_input_buffer(&mut self) -> Result<(), Self::Error>;

    /// Discards queued unsent bytes.
    fn reset_output_buffer(&mut self) -> Result<(), Self::Error>;

    /// Blocks the calling thread for a command settle delay.
    fn delay(&mut self, duration: Duration);

    /// Whether the underlying port is still open.
    fn is_open(&self) -> bool;
}

// --- Scripted test channel ---
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// One recorded channel operation, in call order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Op {
        ResetInput,
        ResetOutput,
        Write(Vec<u8>),
        ReadLine,
        Delay(Duration),
    }

    /// Scripted channel that logs every operation, for ordering assertions.
    ///
    /// `read_line` pops the next scripted line; an exhausted script reads as
    /// a timeout (empty line). Delays are logged, never slept.
    #[derive(Debug, Default)]
    pub(crate) struct MockChannel {
        pub script: VecDeque<Vec<u8>>,
        pub ops: Vec<Op>,
        pub closed: bool,
    }

    impl MockChannel {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a line for a future `read_line`.
        pub fn respond(mut self, line: &[u8]) -> Self {
            self.script.push_back(line.to_vec());
            self
        }

        /// All written frames, in order.
        pub fn writes(&self) -> Vec<&[u8]> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Write(bytes) => Some(bytes.as_slice()),
                    _ => None,
                })
                .collect()
        }

        /// How many times `frame` was written.
        pub fn write_count_of(&self, frame: &[u8]) -> usize {
            self.writes().iter().filter(|w| **w == frame).count()
        }

        /// Every write must be immediately preceded by an input reset and an
        /// output reset.
        pub fn resets_precede_every_write(&self) -> bool {
            self.ops.iter().enumerate().all(|(i, op)| {
                !matches!(op, Op::Write(_))
                    || (i >= 2
                        && self.ops[i - 2] == Op::ResetInput
                        && self.ops[i - 1] == Op::ResetOutput)
            })
        }

        /// Indices of reads and writes only, for request/response ordering
        /// assertions.
        pub fn io_ops(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Write(_) | Op::ReadLine))
                .collect()
        }
    }

    impl SerialChannel for MockChannel {
        type Error = std::convert::Infallible;

        fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.ops.push(Op::Write(bytes.to_vec()));
            Ok(())
        }

        fn read_line(&mut self) -> Result<Vec<u8>, Self::Error> {
            self.ops.push(Op::ReadLine);
            Ok(self.script.pop_front().unwrap_or_default())
        }

        fn reset_input_buffer(&mut self) -> Result<(), Self::Error> {
            self.ops.push(Op::ResetInput);
            Ok(())
        }

        fn reset_output_buffer(&mut self) -> Result<(), Self::Error> {
            self.ops.push(Op::ResetOutput);
            Ok(())
        }

        fn delay(&mut self, duration: Duration) {
            self.ops.push(Op::Delay(duration));
        }

        fn is_open(&self) -> bool {
            !self.closed
        }
    }

    #[test]
    fn test_mock_scripting_and_op_log() {
        let mut chan = MockChannel::new().respond(b"one\r\n");
        chan.reset_input_buffer().unwrap();
        chan.reset_output_buffer().unwrap();
        chan.write_all(b"req").unwrap();
        assert_eq!(chan.read_line().unwrap(), b"one\r\n");
        // Script exhausted: reads behave like a timeout.
        assert_eq!(chan.read_line().unwrap(), b"");

        assert!(chan.resets_precede_every_write());
        assert_eq!(chan.write_count_of(b"req"), 1);
    }

    #[test]
    fn test_mock_detects_missing_resets() {
        let mut chan = MockChannel::new();
        chan.write_all(b"req").unwrap();
        assert!(!chan.resets_precede_every_write());
    }
}
