// src/lib.rs

//! Driver for the Konica Minolta CL-200A chroma meter over RS-232.
//!
//! The meter speaks an ASCII protocol: each frame is STX, a fixed-width
//! payload, ETX, a two-digit decimal XOR checksum, and CRLF. Before it will
//! answer measurement commands the meter must be walked through a three-step
//! handshake (PC-connect, hold, arm for external triggering), which
//! [`Cl200Session`] drives over any [`SerialChannel`].
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cl200a::{Cl200Session, SerialPortChannel};
//!
//! let channel = SerialPortChannel::open_meter("/dev/ttyUSB0")?;
//! let mut session = Cl200Session::new(channel);
//! session.connect()?;
//! let reading = session.measure()?;
//! println!("{:.3} lx", reading.lux);
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod session;

#[cfg(feature = "serial")]
pub mod port;

pub use common::channel::SerialChannel;
pub use common::command::{Command, CoefficientBank};
pub use common::error::{Cl200Error, HandshakeFailure, ParseError};
pub use common::response::{Measurement, MeasurementWarning};
pub use session::{Cl200Session, HandshakePolicy, SessionState};

#[cfg(feature = "serial")]
pub use port::{detect_meter, find_luxmeter_ports, SerialPortChannel};
