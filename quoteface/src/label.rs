//! Text rendering of the watchface fields

use chrono::{NaiveDateTime, Timelike};
use heapless::String;

/// Capacity of a single display field in bytes, large enough for any
/// string an inbox event can carry
pub const LABEL_CAPACITY: usize = crate::dictionary::MAX_STRING_LEN;

/// Text of one display field
pub type Label = String<LABEL_CAPACITY>;

pub const BT_ON: &str = "BT ON";
pub const BT_OFF: &str = "BT OFF";
pub const CHARGING: &str = "Charging";

/// Copy `text` into a label, cutting it at the last char boundary that fits.
pub fn text(text: &str) -> Label {
    let mut label = Label::new();
    for c in text.chars() {
        if label.push(c).is_err() {
            warn!("Label truncated to {} bytes", label.len());
            break;
        }
    }
    label
}

pub fn bluetooth(connected: bool) -> Label {
    text(if connected { BT_ON } else { BT_OFF })
}

pub fn battery(info: crate::BatteryInfo) -> Label {
    if info.charging {
        return text(CHARGING);
    }
    // Fits "100%"
    let mut buf = [0u8; 4];
    text(format_no_std::show(&mut buf, format_args!("{}%", info.percent.min(100))).unwrap_or(""))
}

/// Format the time as `HH:MM` (24h) or `hh:MM` (12h).
pub fn time(time: &NaiveDateTime, clock_24h: bool) -> Label {
    let hour = if clock_24h {
        time.hour()
    } else {
        time.hour12().1
    };
    // Fits "00:00"
    let mut buf = [0u8; 5];
    text(format_no_std::show(&mut buf, format_args!("{:02}:{:02}", hour, time.minute())).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BatteryInfo;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 42)
            .unwrap()
    }

    #[test]
    fn bluetooth_labels() {
        assert_eq!(bluetooth(true), "BT ON");
        assert_eq!(bluetooth(false), "BT OFF");
    }

    #[test]
    fn battery_shows_percentage_when_discharging() {
        let label = |percent| {
            battery(BatteryInfo {
                charging: false,
                percent,
            })
        };
        assert_eq!(label(0), "0%");
        assert_eq!(label(7), "7%");
        assert_eq!(label(64), "64%");
        assert_eq!(label(100), "100%");
        assert_eq!(label(250), "100%");
    }

    #[test]
    fn battery_shows_charging() {
        let info = BatteryInfo {
            charging: true,
            percent: 30,
        };
        assert_eq!(battery(info), "Charging");
    }

    #[test]
    fn time_in_24h_style() {
        assert_eq!(time(&at(0, 5), true), "00:05");
        assert_eq!(time(&at(13, 37), true), "13:37");
        assert_eq!(time(&at(23, 59), true), "23:59");
    }

    #[test]
    fn time_in_12h_style() {
        assert_eq!(time(&at(0, 5), false), "12:05");
        assert_eq!(time(&at(9, 0), false), "09:00");
        assert_eq!(time(&at(12, 30), false), "12:30");
        assert_eq!(time(&at(13, 37), false), "01:37");
    }

    #[test]
    fn long_text_is_cut_at_char_boundary() {
        let long: std::string::String = "é".repeat(LABEL_CAPACITY);
        let label = text(&long);
        assert_eq!(label.len(), LABEL_CAPACITY);
        assert!(label.chars().all(|c| c == 'é'));

        let odd = std::format!("a{}", "é".repeat(LABEL_CAPACITY / 2));
        let label = text(&odd);
        assert_eq!(label.len(), LABEL_CAPACITY - 1);
    }
}
