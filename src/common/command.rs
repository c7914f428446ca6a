// src/common/command.rs

//! CL-200A command definitions.
//!
//! The meter's command set is a table of two-digit command numbers embedded in
//! fixed-width payload strings. The widths are part of the wire protocol and
//! must never be altered per call; every payload here is reproduced
//! byte-for-byte from the CL-200A communication specification.

/// Coefficient banks addressed by the user-calibration commands (47/48).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoefficientBank {
    A,
    B,
    C,
}

/// A CL-200A wire command.
///
/// The coefficient commands are listed for wire-table completeness; the
/// session flow never issues them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read measurement data (X, Y, Z). Command 01; unused, empty payload.
    ReadXyz,
    /// Read measurement data (EV, x, y). Command 02.
    ReadEvXy,
    /// Read measurement data (EV, u', v'). Command 03.
    ReadEvUv,
    /// Read measurement data (EV, TCP, delta-uv). Command 08.
    ReadEvTcpDuv,
    /// Read measurement data (EV, DW, P). Command 15.
    ReadEvDwP,
    /// Set EXT mode. Command 40.
    SetExtTrigger,
    /// Take an EXT measurement and request the readout. Command 40 with the
    /// trigger parameterization.
    ExtTriggerAndRead,
    /// Read measurement data (X2, Y, Z). Command 45.
    ReadX2yz,
    /// Read user-calibration coefficients. Command 47.
    GetCoefficient(CoefficientBank),
    /// Set user-calibration coefficients. Command 48.
    SetCoefficient(CoefficientBank),
    /// Request PC connection mode. Command 54.
    PcConnectRequest,
    /// Expected body of the PC connection acknowledge. Command 54.
    PcConnectResponse,
    /// Set hold status. Command 55.
    HoldMode,
}

impl Command {
    /// The fixed-width payload transmitted between STX and ETX.
    pub const fn payload(self) -> &'static str {
        match self {
            Command::ReadXyz => "",
            Command::ReadEvXy => "00021200",
            Command::ReadEvUv => "00031200",
            Command::ReadEvTcpDuv => "00081200",
            Command::ReadEvDwP => "00151200",
            Command::SetExtTrigger => "004010  ",
            Command::ExtTriggerAndRead => "994021  ",
            Command::ReadX2yz => "00451000",
            Command::GetCoefficient(CoefficientBank::A) => "004711",
            Command::GetCoefficient(CoefficientBank::B) => "004721",
            Command::GetCoefficient(CoefficientBank::C) => "004731",
            Command::SetCoefficient(CoefficientBank::A) => "004811  ",
            Command::SetCoefficient(CoefficientBank::B) => "004821  ",
            Command::SetCoefficient(CoefficientBank::C) => "004831  ",
            Command::PcConnectRequest => "00541   ",
            Command::PcConnectResponse => "0054    ",
            Command::HoldMode => "99551  0",
        }
    }
}
