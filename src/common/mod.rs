// src/common/mod.rs

// --- Protocol leaves shared by the session and the port glue ---
pub mod bcc;
pub mod channel;
pub mod command;
pub mod error;
pub mod frame;
pub mod response;
pub mod timing;

// --- Re-export key types for easier access ---

pub use channel::SerialChannel;
pub use command::{CoefficientBank, Command};
pub use error::{Cl200Error, HandshakeFailure, ParseError};
pub use frame::{encode, Frame, ResponseLine, ValueFields, ETX, STX};
pub use response::{decode_measurement, Measurement, MeasurementWarning};
