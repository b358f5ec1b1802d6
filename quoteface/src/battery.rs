//! Battery charge estimation
//!
//! Conversion based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

/// Snapshot of the battery state as shown on the watchface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryInfo {
    /// Charging state
    pub charging: bool,
    /// Battery percentage (0–100)
    pub percent: u8,
}

impl BatteryInfo {
    /// Build a snapshot from a battery voltage in millivolts.
    pub fn from_millivolts(millivolts: u16, charging: bool) -> Self {
        Self {
            charging,
            percent: percent_from_millivolts(millivolts),
        }
    }
}

/// Convert a raw 12 bit SAADC measurement into the battery voltage in millivolts.
pub fn millivolts_from_adc(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=4095 => {
            // keep as 32 bit for multiplication
            let adc_val = raw_measurement as u32;
            // multiply the ADC value by 2 * 1000 for mV and divide by (2 ^ 12 / 3.3V reference)
            Ok((adc_val * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the battery capacity in percent from its voltage.
///
/// Uses fixed data points and linear interpolation in between.
pub fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidMeasurement,
}
