// src/port/mod.rs

//! `serialport`-backed channel and device discovery.

use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

use log::debug;
use serialport::{ClearBuffer, DataBits, Parity, SerialPort, SerialPortType, StopBits};

use crate::common::{channel::SerialChannel, error::Cl200Error, timing};
use crate::session::Cl200Session;

/// Manufacturer substring reported by the meter's USB-serial bridge.
pub const LUXMETER_MANUFACTURER: &str = "FTDI";

/// [`SerialChannel`] over a system serial port.
pub struct SerialPortChannel {
    port: Box<dyn SerialPort>,
}

impl SerialPortChannel {
    /// Opens `path` with the meter's line settings: 9600 baud, 7 data bits,
    /// even parity, 2 stop bits, 3 s timeout.
    pub fn open_meter(path: &str) -> Result<Self, serialport::Error> {
        let port = serialport::new(path, 9600)
            .data_bits(DataBits::Seven)
            .parity(Parity::Even)
            .stop_bits(StopBits::Two)
            .timeout(timing::DEFAULT_TIMEOUT)
            .open()?;
        Ok(SerialPortChannel { port })
    }

    /// Opens `path` with permissive defaults: 9600 baud, 8 data bits, no
    /// parity, 1 stop bit, 3 s timeout.
    pub fn open(path: &str) -> Result<Self, serialport::Error> {
        let port = serialport::new(path, 9600)
            .timeout(timing::DEFAULT_TIMEOUT)
            .open()?;
        Ok(SerialPortChannel { port })
    }
}

impl SerialChannel for SerialPortChannel {
    type Error = serialport::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Vec<u8>, Self::Error> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if line.ends_with(b"\r\n") {
                        break;
                    }
                }
                // A timeout yields the partial line; short lines surface as
                // parse errors at the protocol layer.
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(line)
    }

    fn reset_input_buffer(&mut self) -> Result<(), Self::Error> {
        self.port.clear(ClearBuffer::Input)
    }

    fn reset_output_buffer(&mut self) -> Result<(), Self::Error> {
        self.port.clear(ClearBuffer::Output)
    }

    fn delay(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn is_open(&self) -> bool {
        // The port stays open for the lifetime of this value and closes on
        // drop.
        true
    }
}

/// Serial ports whose USB manufacturer string looks like the meter's bridge.
pub fn find_luxmeter_ports() -> Result<Vec<String>, serialport::Error> {
    let mut found = Vec::new();
    for info in serialport::available_ports()? {
        if let SerialPortType::UsbPort(usb) = &info.port_type {
            let is_bridge = usb
                .manufacturer
                .as_deref()
                .map_or(false, |m| m.contains(LUXMETER_MANUFACTURER));
            if is_bridge {
                found.push(info.port_name.clone());
            }
        }
    }
    Ok(found)
}

/// Probes every candidate port with the PC-connect handshake and returns a
/// session on the first port that acknowledges.
///
/// The returned session has completed PC-connect only; call
/// [`connect`](Cl200Session::connect) to reach the armed state.
pub fn detect_meter() -> Result<Cl200Session<SerialPortChannel>, Cl200Error<serialport::Error>> {
    let candidates = find_luxmeter_ports().map_err(Cl200Error::Io)?;
    for path in candidates {
        let channel = match SerialPortChannel::open_meter(&path) {
            Ok(channel) => channel,
            Err(e) => {
                debug!("skipping {path}: {e}");
                continue;
            }
        };
        // Probe strictly: only a real acknowledge selects the port.
        let mut session = Cl200Session::new(channel);
        match session.pc_connect() {
            Ok(()) => {
                debug!("CL-200A answered on {path}");
                return Ok(session);
            }
            Err(e) => debug!("no CL-200A on {path}: {e}"),
        }
    }
    Err(Cl200Error::NoDeviceFound)
}
