//! Inbox message dispatcher
//!
//! Maps each validated message to exactly one field update. The dispatcher
//! never touches the display state itself; callers apply the returned
//! [`FieldUpdate`]s to whatever state they own.

use crate::{
    battery::BatteryInfo,
    display::{Field, FieldUpdate},
    label,
    message::{Message, Toggle},
};

/// Shown by `ShowQuote` while no quote has been stored yet.
pub const QUOTE_PLACEHOLDER: &str = "WIP Persistent";

/// Read-only queries of the current system state.
pub trait Peek {
    /// Current Bluetooth connection state
    fn bluetooth_connected(&self) -> bool;
    /// Current battery charge and charging state
    fn battery(&self) -> BatteryInfo;
    /// Last quote received, if any is kept
    fn stored_quote(&self) -> Option<&str> {
        None
    }
}

/// Latest known state of the watch hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemStatus {
    pub bluetooth_connected: bool,
    pub battery: BatteryInfo,
}

impl Peek for SystemStatus {
    fn bluetooth_connected(&self) -> bool {
        self.bluetooth_connected
    }

    fn battery(&self) -> BatteryInfo {
        self.battery
    }
}

/// Compute the field update a message asks for.
pub fn dispatch(message: &Message<'_>, peek: &impl Peek) -> FieldUpdate {
    match *message {
        Message::Quote(quote) => FieldUpdate::set(Field::Quote, label::text(quote)),
        Message::ShowQuote(Toggle::Hidden) => FieldUpdate::clear(Field::Quote),
        Message::ShowQuote(Toggle::Shown) => FieldUpdate::set(
            Field::Quote,
            label::text(peek.stored_quote().unwrap_or(QUOTE_PLACEHOLDER)),
        ),
        Message::ShowBt(Toggle::Hidden) => FieldUpdate::clear(Field::Bluetooth),
        Message::ShowBt(Toggle::Shown) => {
            FieldUpdate::set(Field::Bluetooth, label::bluetooth(peek.bluetooth_connected()))
        }
        Message::ShowBattery(Toggle::Hidden) => FieldUpdate::clear(Field::Battery),
        Message::ShowBattery(Toggle::Shown) => {
            FieldUpdate::set(Field::Battery, label::battery(peek.battery()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stored<'a> {
        status: SystemStatus,
        quote: &'a str,
    }

    impl Peek for Stored<'_> {
        fn bluetooth_connected(&self) -> bool {
            self.status.bluetooth_connected
        }

        fn battery(&self) -> BatteryInfo {
            self.status.battery
        }

        fn stored_quote(&self) -> Option<&str> {
            Some(self.quote)
        }
    }

    fn status(connected: bool, percent: u8, charging: bool) -> SystemStatus {
        SystemStatus {
            bluetooth_connected: connected,
            battery: BatteryInfo { charging, percent },
        }
    }

    #[test]
    fn show_bt_follows_connection_state() {
        let shown = Message::ShowBt(Toggle::Shown);
        let update = dispatch(&shown, &status(true, 0, false));
        assert_eq!(update.field, Field::Bluetooth);
        assert_eq!(update.text, "BT ON");
        assert_eq!(dispatch(&shown, &status(false, 0, false)).text, "BT OFF");
        assert_eq!(
            dispatch(&Message::ShowBt(Toggle::Hidden), &status(true, 0, false)),
            FieldUpdate::clear(Field::Bluetooth)
        );
    }

    #[test]
    fn show_battery_follows_battery_state() {
        let shown = Message::ShowBattery(Toggle::Shown);
        let update = dispatch(&shown, &status(false, 42, false));
        assert_eq!(update.field, Field::Battery);
        assert_eq!(update.text, "42%");
        assert_eq!(dispatch(&shown, &status(false, 42, true)).text, "Charging");
    }

    #[test]
    fn hide_battery_clears_the_field() {
        assert_eq!(
            dispatch(&Message::ShowBattery(Toggle::Hidden), &status(false, 88, false)),
            FieldUpdate::clear(Field::Battery)
        );
    }

    #[test]
    fn quote_is_set_verbatim() {
        let update = dispatch(&Message::Quote("Hello"), &status(false, 0, false));
        assert_eq!(update.field, Field::Quote);
        assert_eq!(update.text, "Hello");
    }

    #[test]
    fn show_quote_uses_placeholder_without_stored_quote() {
        let peek = status(false, 0, false);
        assert_eq!(
            dispatch(&Message::ShowQuote(Toggle::Shown), &peek).text,
            QUOTE_PLACEHOLDER
        );
        assert_eq!(
            dispatch(&Message::ShowQuote(Toggle::Hidden), &peek),
            FieldUpdate::clear(Field::Quote)
        );
    }

    #[test]
    fn show_quote_restores_stored_quote() {
        let peek = Stored {
            status: status(false, 0, false),
            quote: "Stay on target",
        };
        assert_eq!(
            dispatch(&Message::ShowQuote(Toggle::Shown), &peek).text,
            "Stay on target"
        );
    }
}
