//! Quote watchface controller
//!
//! Owns the display state and reacts to the system events the watchface
//! subscribes to: load, minute tick, battery change, Bluetooth change and
//! inbox messages. Every handler returns the set of fields to redraw.

use chrono::NaiveDateTime;

use crate::{
    battery::BatteryInfo,
    config::WatchfaceConfig,
    dictionary::{self, Tuple},
    dispatcher::{self, Peek, SystemStatus},
    display::{DisplayState, Field, FieldSet, FieldUpdate},
    label::{self, Label},
    message::Message,
    time,
};

/// Which of the host driven fields are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Visibility {
    pub bluetooth: bool,
    pub battery: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            bluetooth: true,
            battery: true,
        }
    }
}

/// System status plus the quote kept in memory
struct InboxContext<'a> {
    status: &'a SystemStatus,
    stored_quote: Option<&'a str>,
}

impl Peek for InboxContext<'_> {
    fn bluetooth_connected(&self) -> bool {
        self.status.bluetooth_connected
    }

    fn battery(&self) -> BatteryInfo {
        self.status.battery
    }

    fn stored_quote(&self) -> Option<&str> {
        self.stored_quote
    }
}

pub struct Watchface {
    config: WatchfaceConfig,
    state: DisplayState,
    visibility: Visibility,
    /// Quote restored by `ShowQuote`: the default quote after load, then the
    /// last quote received from the companion app
    stored_quote: Option<Label>,
}

impl Watchface {
    pub fn new(config: WatchfaceConfig) -> Self {
        Self {
            config,
            state: DisplayState::default(),
            visibility: Visibility::default(),
            stored_quote: None,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Fill every field for the first frame.
    pub fn load(&mut self, utc: NaiveDateTime, status: &SystemStatus) -> FieldSet {
        self.state
            .apply(FieldUpdate::set(Field::Bluetooth, label::bluetooth(status.bluetooth_connected)));
        self.state
            .apply(FieldUpdate::set(Field::Battery, label::battery(status.battery)));
        self.update_time(utc);
        let quote = label::text(self.config.default_quote);
        self.state.apply(FieldUpdate::set(Field::Quote, quote.clone()));
        self.stored_quote = Some(quote);
        info!("Watchface loaded");
        FieldSet::all()
    }

    /// Minute tick: refresh the visible status fields and the time.
    pub fn on_tick(&mut self, utc: NaiveDateTime, status: &SystemStatus) -> FieldSet {
        let mut changed = FieldSet::empty();
        changed.extend_from(self.on_bluetooth(status.bluetooth_connected));
        changed.extend_from(self.on_battery(status.battery));
        if self.update_time(utc) {
            changed.insert(Field::Time);
        }
        changed
    }

    pub fn on_bluetooth(&mut self, connected: bool) -> FieldSet {
        let mut changed = FieldSet::empty();
        if self.visibility.bluetooth
            && self
                .state
                .apply(FieldUpdate::set(Field::Bluetooth, label::bluetooth(connected)))
        {
            changed.insert(Field::Bluetooth);
        }
        changed
    }

    pub fn on_battery(&mut self, info: BatteryInfo) -> FieldSet {
        let mut changed = FieldSet::empty();
        if self.visibility.battery
            && self
                .state
                .apply(FieldUpdate::set(Field::Battery, label::battery(info)))
        {
            changed.insert(Field::Battery);
        }
        changed
    }

    /// Handle one inbox event.
    pub fn on_inbox<'a, I>(&mut self, batch: I, status: &SystemStatus) -> FieldSet
    where
        I: IntoIterator<Item = Result<Tuple<'a>, dictionary::Error>>,
    {
        let mut changed = FieldSet::empty();
        for tuple in batch {
            let message = match tuple.map(|tuple| (tuple.key, Message::from_tuple(&tuple))) {
                Ok((_, Ok(Some(message)))) => message,
                Ok((_, Ok(None))) => continue,
                Ok((key, Err(err))) => {
                    warn!("Rejected inbox tuple {}: {:?}", key, err);
                    continue;
                }
                Err(err) => {
                    warn!("Malformed inbox tuple: {:?}", err);
                    continue;
                }
            };
            debug!("Inbox message: {:?}", message);

            let update = {
                let context = InboxContext {
                    status,
                    stored_quote: self.stored_quote.as_deref(),
                };
                dispatcher::dispatch(&message, &context)
            };

            match message {
                Message::Quote(_) => self.stored_quote = Some(update.text.clone()),
                Message::ShowBt(toggle) => self.visibility.bluetooth = toggle.is_shown(),
                Message::ShowBattery(toggle) => self.visibility.battery = toggle.is_shown(),
                Message::ShowQuote(_) => {}
            }

            let field = update.field;
            if self.state.apply(update) {
                changed.insert(field);
            }
        }
        changed
    }

    fn update_time(&mut self, utc: NaiveDateTime) -> bool {
        let local = time::to_local(utc, self.config.utc_offset_secs);
        self.state
            .apply(FieldUpdate::set(Field::Time, label::time(&local, self.config.clock_24h)))
    }
}
