// src/session/measure.rs

//! The EXT measurement cycle.

use log::debug;

use super::{Cl200Session, SessionState};
use crate::common::{
    channel::SerialChannel,
    command::Command,
    error::Cl200Error,
    frame::ResponseLine,
    response::{decode_measurement, Measurement, MeasurementWarning},
    timing,
};

impl<C: SerialChannel> Cl200Session<C> {
    /// Triggers one EXT measurement and decodes the lux reading.
    ///
    /// Requires an armed session. The trigger and readout frames are sent
    /// back to back with no read in between; that ordering is part of the
    /// device's trigger/read semantics. Non-fatal device conditions are
    /// returned as warnings on the measurement, fatal ones as errors.
    pub fn measure(&mut self) -> Result<Measurement, Cl200Error<C::Error>> {
        if self.state != SessionState::ExtArmed {
            return Err(Cl200Error::NotArmed);
        }

        self.send_command(Command::ExtTriggerAndRead, timing::TRIGGER_SETTLE)?;
        self.send_command(Command::ReadEvXy, timing::READ_SETTLE)?;

        let line = self.read_line()?;
        let measurement = decode_measurement(&ResponseLine::new(&line)?)?;

        match measurement.warning {
            Some(MeasurementWarning::RangeExceeded) => {
                debug!("measurement exceeds the device range");
            }
            Some(MeasurementWarning::LowLuminance) => {
                debug!("low luminance; reduced accuracy for chromaticity");
            }
            None => {}
        }

        Ok(measurement)
    }
}
