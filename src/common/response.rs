// src/common/response.rs

//! Measurement decoding.
//!
//! A readout line carries a status byte, a low-battery flag, and the first
//! data block as sign + four mantissa digits + one exponent digit biased by
//! 4: `lux = sign * mantissa * 10^(digit - 4)`.

use std::fmt::{self, Debug};
use std::str;

use super::error::{Cl200Error, ParseError};
use super::frame::{ResponseLine, ValueFields};

/// Non-fatal conditions attached to a successful measurement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MeasurementWarning {
    /// The measurement exceeds the device range.
    RangeExceeded,
    /// Luminance is low; chromaticity accuracy is reduced.
    LowLuminance,
}

impl fmt::Display for MeasurementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementWarning::RangeExceeded => write!(f, "measurement exceeds the device range"),
            MeasurementWarning::LowLuminance => {
                write!(f, "low luminance; reduced accuracy for chromaticity")
            }
        }
    }
}

/// A decoded lux reading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    /// Illuminance in lux, rounded to 3 decimal places.
    pub lux: f64,
    /// Set when the device flagged a non-fatal condition.
    pub warning: Option<MeasurementWarning>,
}

/// Status-byte values that indicate an unrecoverable device fault.
pub(crate) const FATAL_STATUSES: [char; 3] = ['1', '2', '3'];

/// Decodes one readout line into a measurement or a fatal error.
///
/// Fatal conditions (device fault, low battery) abort decoding; range and
/// low-luminance statuses become warnings on the returned value.
pub fn decode_measurement<E>(line: &ResponseLine<'_>) -> Result<Measurement, Cl200Error<E>>
where
    E: Debug,
{
    let status = line.status()?;
    if FATAL_STATUSES.contains(&status) {
        return Err(Cl200Error::DeviceFault { status });
    }
    let warning = match status {
        '5' => Some(MeasurementWarning::RangeExceeded),
        '6' => Some(MeasurementWarning::LowLuminance),
        _ => None,
    };

    if line.battery_low()? {
        return Err(Cl200Error::LowBattery);
    }

    let lux = reconstruct_lux(&line.value_fields()?)?;
    Ok(Measurement { lux, warning })
}

fn reconstruct_lux(fields: &ValueFields<'_>) -> Result<f64, ParseError> {
    let sign = if fields.sign == '+' { 1.0 } else { -1.0 };

    let mantissa: f64 = str::from_utf8(fields.mantissa)
        .map_err(|_| ParseError::InvalidMantissa)?
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidMantissa)?;

    let exponent = fields
        .exponent
        .to_digit(10)
        .ok_or(ParseError::InvalidExponent {
            found: fields.exponent,
        })? as i32
        - 4;

    Ok(round3(sign * mantissa * 10f64.powi(exponent)))
}

/// Rounds to exactly 3 decimal places.
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    // Builds a readout line with the documented fixed offsets: status at 6,
    // battery flag at 8, first data block at 9..=14.
    fn readout(status: char, battery: char, sign: char, mantissa: &str, exponent: char) -> Vec<u8> {
        assert_eq!(mantissa.len(), 4);
        let mut s = String::from("\x020002 ");
        s.push(status);
        s.push(' ');
        s.push(battery);
        s.push(sign);
        s.push_str(mantissa);
        s.push(exponent);
        s.push_str("+00000+00000\x0300\r\n");
        s.into_bytes()
    }

    fn decode(raw: &[u8]) -> Result<Measurement, Cl200Error> {
        decode_measurement(&ResponseLine::new(raw).unwrap())
    }

    #[test]
    fn test_decode_plain_value() {
        let m = decode(&readout('0', '0', '+', "1234", '4')).unwrap();
        assert_eq!(m.lux, 1234.0);
        assert_eq!(m.warning, None);
    }

    #[test]
    fn test_decode_exponent_bias() {
        // Digit 4 is the neutral exponent; 2 shifts two places down.
        let m = decode(&readout('0', '0', '+', "1234", '2')).unwrap();
        assert_eq!(m.lux, 12.34);

        let m = decode(&readout('0', '0', '+', "1234", '5')).unwrap();
        assert_eq!(m.lux, 12340.0);
    }

    #[test]
    fn test_decode_negative_sign() {
        let m = decode(&readout('0', '0', '-', "1234", '4')).unwrap();
        assert_eq!(m.lux, -1234.0);
    }

    #[test]
    fn test_decode_rounds_to_three_decimals() {
        // 1234 * 10^-4 = 0.1234
        let m = decode(&readout('0', '0', '+', "1234", '0')).unwrap();
        assert_eq!(m.lux, 0.123);

        // 5678 * 10^-4 = 0.5678 -> 0.568
        let m = decode(&readout('0', '0', '+', "5678", '0')).unwrap();
        assert_eq!(m.lux, 0.568);
    }

    #[test]
    fn test_fatal_status_aborts() {
        for status in FATAL_STATUSES {
            let err = decode(&readout(status, '0', '+', "1234", '4')).unwrap_err();
            assert!(
                matches!(err, Cl200Error::DeviceFault { status: s } if s == status),
                "status {status}"
            );
        }
    }

    #[test]
    fn test_range_exceeded_is_a_warning_not_an_error() {
        let m = decode(&readout('5', '0', '+', "9999", '9')).unwrap();
        assert_eq!(m.warning, Some(MeasurementWarning::RangeExceeded));
    }

    #[test]
    fn test_low_luminance_is_a_warning_not_an_error() {
        let m = decode(&readout('6', '0', '+', "0012", '4')).unwrap();
        assert_eq!(m.warning, Some(MeasurementWarning::LowLuminance));
        assert_eq!(m.lux, 12.0);
    }

    #[test]
    fn test_low_battery_aborts() {
        let err = decode(&readout('0', '1', '+', "1234", '4')).unwrap_err();
        assert!(matches!(err, Cl200Error::LowBattery));
    }

    #[test]
    fn test_battery_checked_after_fatal_status() {
        // A device fault wins over the battery flag.
        let err = decode(&readout('2', '1', '+', "1234", '4')).unwrap_err();
        assert!(matches!(err, Cl200Error::DeviceFault { status: '2' }));
    }

    #[test]
    fn test_short_line_is_parse_error() {
        let err = decode(b"\x020002 0 0+12").unwrap_err();
        assert!(matches!(
            err,
            Cl200Error::Parse(ParseError::TooShort { needed: 15, .. })
        ));
    }

    #[test]
    fn test_garbage_mantissa_is_parse_error() {
        let err = decode(&readout('0', '0', '+', "12x4", '4')).unwrap_err();
        assert!(matches!(err, Cl200Error::Parse(ParseError::InvalidMantissa)));
    }

    #[test]
    fn test_non_digit_exponent_is_parse_error() {
        let err = decode(&readout('0', '0', '+', "1234", 'x')).unwrap_err();
        assert!(matches!(
            err,
            Cl200Error::Parse(ParseError::InvalidExponent { found: 'x' })
        ));
    }
}
