//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};
use quoteface::{
    battery::{self, Error},
    BatteryInfo,
};

pub struct BatteryStatus<'a> {
    /// Pin P0.12: High = battery, Low = charging
    pin_charge_indication: Input<'a, P0_12>,

    /// Saadc instance, pin P0.31 measures the voltage level
    saadc: Saadc<'a, 1>,

    /// Charging state
    charging: bool,

    /// Battery voltage in millivolts
    voltage: u16,
}

impl<'a> BatteryStatus<'a> {
    /// Initialize battery status
    pub async fn init(pin_charge_indication: Input<'a, P0_12>, saadc: Saadc<'a, 1>) -> Result<Self, Error> {
        let mut status = Self {
            pin_charge_indication,
            saadc,
            charging: false,
            voltage: 0,
        };
        status.update().await?;
        Ok(status)
    }

    /// Return current state of the battery.
    ///
    /// This returns the stored value. To fetch current data, call `update()` first.
    pub fn info(&self) -> BatteryInfo {
        BatteryInfo::from_millivolts(self.voltage, self.charging)
    }

    /// Return the current battery voltage in millivolts.
    ///
    /// This returns the stored value. To fetch current data, call `update()` first.
    #[allow(unused)]
    pub fn voltage(&self) -> u16 {
        self.voltage
    }

    /// Update the current battery status by reading information from the
    /// hardware. Return whether or not the displayed values changed.
    pub async fn update(&mut self) -> Result<bool, Error> {
        let before = self.info();

        // Check charging status
        self.charging = self.pin_charge_indication.is_low();

        // Check voltage
        let mut buf = [0; 1];
        self.saadc.sample(&mut buf).await;
        self.voltage = battery::millivolts_from_adc(buf[0])?;

        Ok(self.info() != before)
    }
}
